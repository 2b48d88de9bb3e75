//! Order money calculation
//!
//! Prices are `Decimal` end to end: `total_amount` is the exact sum of the
//! line subtotals, with no rounding step.

use super::OrderError;
use rust_decimal::Decimal;
use shared::models::{CreateOrderRequest, OrderLineInput};

/// Maximum allowed price per item
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: i32 = 9999;

/// Aggregates stored on the order row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub amount: Decimal,
    pub items: i32,
}

#[inline]
pub fn line_subtotal(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

pub fn compute_totals(lines: &[OrderLineInput]) -> OrderTotals {
    lines.iter().fold(
        OrderTotals {
            amount: Decimal::ZERO,
            items: 0,
        },
        |acc, line| OrderTotals {
            amount: acc.amount + line_subtotal(line.price, line.quantity),
            items: acc.items + line.quantity,
        },
    )
}

pub fn validate_line(line: &OrderLineInput) -> Result<(), OrderError> {
    if line.name.trim().is_empty() {
        return Err(OrderError::InvalidItem(format!(
            "dish {} has an empty name",
            line.id
        )));
    }
    if line.quantity <= 0 {
        return Err(OrderError::InvalidItem(format!(
            "quantity must be positive, got {} for {}",
            line.quantity, line.name
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidItem(format!(
            "quantity exceeds maximum allowed ({}), got {} for {}",
            MAX_QUANTITY, line.quantity, line.name
        )));
    }
    if line.price < Decimal::ZERO {
        return Err(OrderError::InvalidItem(format!(
            "price must be non-negative, got {} for {}",
            line.price, line.name
        )));
    }
    if line.price > MAX_PRICE {
        return Err(OrderError::InvalidItem(format!(
            "price exceeds maximum allowed ({}), got {} for {}",
            MAX_PRICE, line.price, line.name
        )));
    }
    Ok(())
}

/// Reject requests that must not reach the store
pub fn validate_request(request: &CreateOrderRequest) -> Result<(), OrderError> {
    if request.items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    request.items.iter().try_for_each(validate_line)?;
    // Per-line bounds keep each subtotal small; the item count still has to fit
    request
        .items
        .iter()
        .try_fold(0i32, |acc, line| acc.checked_add(line.quantity))
        .map(|_| ())
        .ok_or_else(|| OrderError::InvalidItem("too many items in one order".to_string()))
}
