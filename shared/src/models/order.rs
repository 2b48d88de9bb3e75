//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Order status
///
/// ```text
/// pending ──► confirmed ──► preparing ──► completed
///    │            │
///    └────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Wire representation (store column value)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable in one step from this one
    pub const fn next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::Completed],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    /// Human-facing number generated by the store (distinct from `id`)
    pub order_number: String,
    /// Sum of item subtotals, in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Sum of item quantities
    pub total_items: i32,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub table_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line, a snapshot of the dish at order time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Catalog reference; the dish may since have been removed
    pub dish_id: Option<String>,
    pub dish_name: String,
    pub dish_category: String,
    /// Price in currency unit, copied at order time
    #[serde(with = "rust_decimal::serde::float")]
    pub dish_price: Decimal,
    pub quantity: i32,
    /// `dish_price * quantity`
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub is_popular: bool,
    pub created_at: DateTime<Utc>,
}

/// Order together with its items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderWithItems {
    /// Sum of item subtotals
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.subtotal).sum()
    }

    /// Sum of item quantities
    pub fn items_quantity(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Optional customer details attached to an order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One line of a create-order request
///
/// Shaped like a cart item (dish fields plus quantity); extra dish fields
/// such as `description` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    /// Catalog dish id
    pub id: String,
    pub name: String,
    pub category: String,
    /// Price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub popular: Option<bool>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLineInput>,
    #[serde(flatten)]
    pub customer: CustomerInfo,
}

/// Update status payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Preparing));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Preparing.can_transition_to(Completed));
        assert!(!Preparing.can_transition_to(Cancelled));
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Preparing).unwrap(),
            "\"preparing\""
        );
        assert_eq!("cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("void".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_create_request_accepts_cart_items() {
        let json = r#"{
            "items": [{
                "id": "a",
                "name": "驴肉火烧",
                "price": 15,
                "category": "主食",
                "description": "酥脆",
                "imageUrl": "https://example.com/a.png",
                "popular": true,
                "quantity": 2
            }],
            "customerName": "张三",
            "tableNumber": "8"
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0].price, Decimal::from(15));
        assert_eq!(req.items[0].popular, Some(true));
        assert_eq!(req.customer.customer_name.as_deref(), Some("张三"));
        assert_eq!(req.customer.table_number.as_deref(), Some("8"));
        assert!(req.customer.notes.is_none());
    }
}
