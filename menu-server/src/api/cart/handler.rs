//! Cart API Handlers
//!
//! Prices always come from the server's menu; the client only sends dish
//! ids and quantities.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Cart, CartLine, CustomerInfo, OrderWithItems};

use crate::core::ServerState;
use crate::orders::OrderError;
use crate::orders::money::MAX_QUANTITY;
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    pub cart: Cart,
    #[serde(flatten)]
    pub customer: CustomerInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<CartLine>,
    pub total_items: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// POST /api/cart/quote
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<CartRequest>,
) -> AppResult<ApiResponse<CartQuote>> {
    check_quantities(&payload.cart)?;
    let catalog = state.menu.dishes().await;
    let lines = payload.cart.lines(&catalog);
    let total_items = lines
        .iter()
        .try_fold(0i32, |acc, l| acc.checked_add(l.quantity))
        .ok_or_else(cart_too_large)?;
    let total_price = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.subtotal))
        .ok_or_else(cart_too_large)?;
    Ok(ApiResponse::success(CartQuote {
        lines,
        total_items,
        total_price,
    }))
}

/// POST /api/cart/checkout
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CartRequest>,
) -> AppResult<ApiResponse<OrderWithItems>> {
    check_quantities(&payload.cart)?;
    let catalog = state.menu.dishes().await;
    let request = payload
        .cart
        .to_order_request(&catalog, payload.customer)
        .ok_or(OrderError::EmptyOrder)?;

    let created = state.orders.create_order(&request).await?;
    let message = format!(
        "客官您好！一共 {} 元。这就给您下单，请稍坐！",
        created.order.total_amount.normalize()
    );
    Ok(ApiResponse::success_with_message(message, created))
}

/// Quantities above what an order line accepts are rejected up front
fn check_quantities(cart: &Cart) -> Result<(), AppError> {
    match cart.entries().find(|(_, q)| *q > MAX_QUANTITY) {
        Some((dish_id, quantity)) => Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity} for {dish_id}"
        ))
        .with_detail("dishId", dish_id)
        .with_detail("quantity", quantity)),
        None => Ok(()),
    }
}

fn cart_too_large() -> AppError {
    AppError::validation("cart total is too large")
}
