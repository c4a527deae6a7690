//! Order line - frozen, priced snapshot of one cart entry

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order line record
///
/// `total_price == quantity * unit_price` always holds: quantity and unit
/// price are only writable through setters that recompute the total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Line ID within the order (assigned on assembly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_item_id: Option<String>,
    /// Catalog item ID
    pub menu_item_id: String,
    /// Item name captured at order time
    pub menu_item_name: String,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
    /// Rendered modifier choices (e.g. "Size: Large; Iced")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<String>,
    /// Free-text cooking notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_details: Option<String>,
}

impl OrderLine {
    pub fn new(
        menu_item_id: impl Into<String>,
        menu_item_name: impl Into<String>,
        quantity: i32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            order_item_id: None,
            menu_item_id: menu_item_id.into(),
            menu_item_name: menu_item_name.into(),
            quantity,
            unit_price,
            total_price: unit_price * Decimal::from(quantity),
            customization: None,
            cooking_details: None,
        }
    }

    pub fn with_customization(mut self, customization: Option<String>) -> Self {
        self.customization = customization;
        self
    }

    pub fn with_cooking_details(mut self, cooking_details: Option<String>) -> Self {
        self.cooking_details = cooking_details;
        self
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
        self.recompute();
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.recompute();
    }

    /// Re-derives the total (also used after deserializing untrusted records)
    pub fn recompute(&mut self) {
        self.total_price = self.unit_price * Decimal::from(self.quantity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_follows_quantity_and_price() {
        let mut line = OrderLine::new("burger", "Burger", 2, Decimal::new(1450, 2));
        assert_eq!(line.total_price(), Decimal::new(2900, 2));

        line.set_quantity(3);
        assert_eq!(line.total_price(), Decimal::new(4350, 2));

        line.set_unit_price(Decimal::new(1000, 2));
        assert_eq!(line.total_price(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_record_shape() {
        let line = OrderLine::new("burger", "Burger", 1, Decimal::new(1000, 2))
            .with_cooking_details(Some("no onion".to_string()));
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["menuItemId"], "burger");
        assert_eq!(json["menuItemName"], "Burger");
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["totalPrice"], 10.0);
        assert_eq!(json["cookingDetails"], "no onion");
        assert!(json.get("orderItemId").is_none());
    }
}
