//! Store row shapes for `orders` and `order_items`
//!
//! Column names are the store's snake_case ones. Numeric columns accept a
//! JSON number or a string (PostgREST returns `numeric` as either,
//! depending on configuration). Empty customer strings on the wire map to
//! `None` on the domain side.

use super::money::{OrderTotals, line_subtotal};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{CustomerInfo, Order, OrderItem, OrderLineInput, OrderStatus};
use uuid::Uuid;

pub const ORDERS_TABLE: &str = "orders";
pub const ORDER_ITEMS_TABLE: &str = "order_items";
pub const ORDER_NUMBER_FN: &str = "generate_order_number";

/// Insert payload for `orders`
#[derive(Debug, Serialize)]
pub struct NewOrderRow<'a> {
    pub order_number: &'a str,
    pub total_amount: Decimal,
    pub total_items: i32,
    pub status: OrderStatus,
    pub customer_name: &'a str,
    pub customer_phone: &'a str,
    pub table_number: &'a str,
    pub notes: &'a str,
}

impl<'a> NewOrderRow<'a> {
    /// Fresh `pending` order; absent customer fields are sent as `""`
    pub fn pending(order_number: &'a str, totals: OrderTotals, customer: &'a CustomerInfo) -> Self {
        Self {
            order_number,
            total_amount: totals.amount,
            total_items: totals.items,
            status: OrderStatus::Pending,
            customer_name: customer.customer_name.as_deref().unwrap_or_default(),
            customer_phone: customer.customer_phone.as_deref().unwrap_or_default(),
            table_number: customer.table_number.as_deref().unwrap_or_default(),
            notes: customer.notes.as_deref().unwrap_or_default(),
        }
    }
}

/// Insert payload for `order_items`, a snapshot of the dish at order time
///
/// `created_at` is sent explicitly: a bulk insert gets a single `now()` for
/// every row, and items are read back ordered by this column.
#[derive(Debug, Serialize)]
pub struct NewOrderItemRow<'a> {
    pub order_id: Uuid,
    pub dish_id: &'a str,
    pub dish_name: &'a str,
    pub dish_category: &'a str,
    pub dish_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub is_popular: bool,
    pub created_at: String,
}

impl<'a> NewOrderItemRow<'a> {
    /// Row for the `index`-th line; timestamps step by one microsecond from `base`
    pub fn snapshot(
        order_id: Uuid,
        index: usize,
        line: &'a OrderLineInput,
        base: DateTime<Utc>,
    ) -> Self {
        let offset = TimeDelta::microseconds(i64::try_from(index).unwrap_or(i64::MAX));
        let created_at = base.checked_add_signed(offset).unwrap_or(base);
        Self {
            order_id,
            dish_id: &line.id,
            dish_name: &line.name,
            dish_category: &line.category,
            dish_price: line.price,
            quantity: line.quantity,
            subtotal: line_subtotal(line.price, line.quantity),
            is_popular: line.popular.unwrap_or(false),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub total_amount: Decimal,
    pub total_items: i32,
    pub status: OrderStatus,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    #[serde(default)]
    pub dish_id: Option<String>,
    pub dish_name: String,
    #[serde(default)]
    pub dish_category: Option<String>,
    pub dish_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
    #[serde(default)]
    pub is_popular: Option<bool>,
    pub created_at: DateTime<Utc>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            order_number: row.order_number,
            total_amount: row.total_amount,
            total_items: row.total_items,
            status: row.status,
            customer_name: non_empty(row.customer_name),
            customer_phone: non_empty(row.customer_phone),
            table_number: non_empty(row.table_number),
            notes: non_empty(row.notes),
            created_at: row.created_at,
            updated_at: row.updated_at.unwrap_or(row.created_at),
        }
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            dish_id: non_empty(row.dish_id),
            dish_name: row.dish_name,
            dish_category: row.dish_category.unwrap_or_default(),
            dish_price: row.dish_price,
            quantity: row.quantity,
            subtotal: row.subtotal,
            is_popular: row.is_popular.unwrap_or(false),
            created_at: row.created_at,
        }
    }
}

/// `id` column of a raw row, if it parses
pub fn row_id(row: &Value) -> Option<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}
