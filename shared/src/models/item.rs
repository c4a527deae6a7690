//! Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stock value meaning "not tracked"
pub const UNLIMITED_STOCK: i32 = -1;

fn default_true() -> bool {
    true
}

fn default_stock() -> i32 {
    UNLIMITED_STOCK
}

/// Catalog item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Unit price in currency unit (non-negative)
    pub price: Decimal,
    pub category: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Remaining stock (-1 = unlimited)
    #[serde(default = "default_stock")]
    pub stock: i32,
    /// Drink capability:
    /// - `Some(true)`: bundles a drink, customer picks hot or iced
    /// - `Some(false)`: declares a drink option but bundles none
    /// - `None`: exposes no drink capability at all (implicit combo)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundled_drink: Option<bool>,
    /// Modifier groups in display (and validation) order
    #[serde(default)]
    pub modifier_group_ids: Vec<String>,
}

impl Item {
    /// Whether a hot/iced choice applies to this item
    pub fn bundles_drink(&self) -> bool {
        self.bundled_drink == Some(true)
    }

    /// Whether the item declares any drink option at all
    pub fn has_drink_capability(&self) -> bool {
        self.bundled_drink.is_some()
    }

    pub fn is_stock_tracked(&self) -> bool {
        self.stock >= 0
    }

    /// Whether `quantity` units can be supplied right now
    pub fn can_supply(&self, quantity: i32) -> bool {
        self.is_available && (!self.is_stock_tracked() || quantity <= self.stock)
    }

    /// Whether the item exposes the given modifier group
    pub fn exposes_group(&self, group_id: &str) -> bool {
        self.modifier_group_ids.iter().any(|id| id == group_id)
    }
}
