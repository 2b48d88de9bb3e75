//! Cart Model
//!
//! Dish id → quantity, resolved against the catalog when a total or an
//! order request is needed.

use super::dish::Dish;
use super::order::{CreateOrderRequest, CustomerInfo, OrderLineInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shopping cart
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart {
    quantities: BTreeMap<String, i32>,
}

/// Cart line resolved against the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub dish: Dish,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one portion of a dish
    pub fn add(&mut self, dish_id: impl Into<String>) {
        let q = self.quantities.entry(dish_id.into()).or_insert(0);
        *q = q.saturating_add(1);
    }

    /// Remove one portion; the entry disappears at zero
    pub fn remove_one(&mut self, dish_id: &str) {
        if let Some(q) = self.quantities.get_mut(dish_id) {
            *q -= 1;
            if *q <= 0 {
                self.quantities.remove(dish_id);
            }
        }
    }

    /// Set an explicit quantity (≤ 0 removes the entry)
    pub fn set_quantity(&mut self, dish_id: impl Into<String>, quantity: i32) {
        let dish_id = dish_id.into();
        if quantity <= 0 {
            self.quantities.remove(&dish_id);
        } else {
            self.quantities.insert(dish_id, quantity);
        }
    }

    pub fn quantity(&self, dish_id: &str) -> i32 {
        self.quantities.get(dish_id).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.quantities.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|q| *q <= 0)
    }

    /// Positive entries as (dish id, quantity)
    pub fn entries(&self) -> impl Iterator<Item = (&str, i32)> {
        self.quantities
            .iter()
            .filter(|(_, q)| **q > 0)
            .map(|(id, q)| (id.as_str(), *q))
    }

    /// Total portions, including dishes unknown to the catalog (saturating)
    pub fn total_items(&self) -> i32 {
        self.entries().fold(0i32, |acc, (_, q)| acc.saturating_add(q))
    }

    /// Resolve positive entries against the catalog
    ///
    /// Unknown ids are skipped, as are lines whose subtotal does not fit a
    /// `Decimal`.
    pub fn lines(&self, catalog: &[Dish]) -> Vec<CartLine> {
        self.entries()
            .filter_map(|(id, q)| {
                let dish = catalog.iter().find(|d| d.id == id)?;
                Some(CartLine {
                    dish: dish.clone(),
                    quantity: q,
                    subtotal: dish.price.checked_mul(Decimal::from(q))?,
                })
            })
            .collect()
    }

    /// Sum of resolved subtotals; `None` on overflow
    pub fn total_price(&self, catalog: &[Dish]) -> Option<Decimal> {
        self.lines(catalog)
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.subtotal))
    }

    /// Build the request consumed by the order repository
    ///
    /// Returns `None` when no line resolves against the catalog.
    pub fn to_order_request(
        &self,
        catalog: &[Dish],
        customer: CustomerInfo,
    ) -> Option<CreateOrderRequest> {
        let items: Vec<OrderLineInput> = self
            .lines(catalog)
            .into_iter()
            .map(|line| OrderLineInput {
                id: line.dish.id,
                name: line.dish.name,
                category: line.dish.category,
                price: line.dish.price,
                quantity: line.quantity,
                popular: line.dish.popular,
            })
            .collect();

        if items.is_empty() {
            return None;
        }
        Some(CreateOrderRequest { items, customer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(id: &str, name: &str, price: i64) -> Dish {
        Dish {
            id: id.into(),
            name: name.into(),
            price: Decimal::from(price),
            category: "主食".into(),
            description: String::new(),
            image_url: String::new(),
            spicy_level: None,
            popular: Some(id == "a"),
        }
    }

    #[test]
    fn test_add_remove() {
        let mut cart = Cart::new();
        cart.add("a");
        cart.add("a");
        cart.add("b");
        assert_eq!(cart.quantity("a"), 2);
        assert_eq!(cart.total_items(), 3);

        cart.remove_one("b");
        assert_eq!(cart.quantity("b"), 0);
        assert_eq!(cart.total_items(), 2);

        cart.remove_one("missing");
        cart.set_quantity("a", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_skip_unknown_dishes() {
        let catalog = vec![dish("a", "驴肉火烧", 15), dish("b", "小米粥", 5)];
        let mut cart = Cart::new();
        cart.set_quantity("a", 2);
        cart.set_quantity("ghost", 4);
        cart.add("b");

        let lines = cart.lines(&catalog);
        assert_eq!(lines.len(), 2);
        assert_eq!(cart.total_price(&catalog), Some(Decimal::from(35)));
        // Unknown dish still counts toward the badge total
        assert_eq!(cart.total_items(), 7);
    }

    #[test]
    fn test_to_order_request() {
        let catalog = vec![dish("a", "驴肉火烧", 15)];
        let mut cart = Cart::new();
        cart.set_quantity("a", 2);

        let customer = CustomerInfo {
            table_number: Some("3".into()),
            ..Default::default()
        };
        let req = cart.to_order_request(&catalog, customer).unwrap();
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0].quantity, 2);
        assert_eq!(req.items[0].popular, Some(true));
        assert_eq!(req.customer.table_number.as_deref(), Some("3"));

        let empty = Cart::new();
        assert!(empty.to_order_request(&catalog, CustomerInfo::default()).is_none());
    }

    #[test]
    fn test_huge_quantities_do_not_panic() {
        let mut catalog = vec![dish("a", "驴肉火烧", 15), dish("b", "小米粥", 5)];
        catalog[1].price = Decimal::MAX;
        let mut cart = Cart::new();
        cart.set_quantity("a", i32::MAX);
        cart.set_quantity("b", i32::MAX);

        assert_eq!(cart.total_items(), i32::MAX);
        // Decimal::MAX * i32::MAX does not fit; that line is dropped
        let lines = cart.lines(&catalog);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].dish.id, "a");
        assert_eq!(
            cart.total_price(&catalog),
            Some(Decimal::from(15) * Decimal::from(i32::MAX))
        );
        assert_eq!(cart.entries().count(), 2);
    }

    #[test]
    fn test_cart_serializes_as_map() {
        let mut cart = Cart::new();
        cart.set_quantity("a", 2);
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"a":2}"#);
        let back: Cart = serde_json::from_str(r#"{"b":1}"#).unwrap();
        assert_eq!(back.quantity("b"), 1);
    }
}
