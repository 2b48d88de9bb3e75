//! Dish and Category Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum spicy level (0: none, 1: mild, 2: medium, 3: super)
pub const MAX_SPICY_LEVEL: u8 = 3;

/// Menu dish
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Category name (free-form, matches [`CategoryConfig::name`])
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spicy_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popular: Option<bool>,
}

impl Dish {
    pub fn is_popular(&self) -> bool {
        self.popular.unwrap_or(false)
    }
}

/// Menu category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// true = front page, false = back page
    pub is_front: bool,
}
