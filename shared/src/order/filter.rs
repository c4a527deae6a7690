//! Subscription filters - the result sets observers watch

use super::record::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which orders an observer sees, and in which order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum OrderFilter {
    /// Kitchen board: every pending or preparing order, oldest first
    Kitchen,
    /// One customer's order history, newest first
    Customer(String),
    /// One table's orders, newest first
    Table(String),
    /// Everything, newest first
    All,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderFilter::Kitchen => matches!(
                order.status(),
                OrderStatus::Pending | OrderStatus::Preparing
            ),
            OrderFilter::Customer(user_id) => order.user_id.as_deref() == Some(user_id.as_str()),
            OrderFilter::Table(table) => order.table_number.as_deref() == Some(table.as_str()),
            OrderFilter::All => true,
        }
    }

    /// Delivery order for the filtered list
    pub fn compare(&self, a: &Order, b: &Order) -> Ordering {
        let oldest_first = a
            .created_at
            .cmp(&b.created_at)
            .then_with(|| a.order_id.cmp(&b.order_id));
        match self {
            OrderFilter::Kitchen => oldest_first,
            _ => oldest_first.reverse(),
        }
    }

    /// Sort a list into delivery order
    pub fn sort(&self, orders: &mut [Order]) {
        orders.sort_by(|a, b| self.compare(a, b));
    }
}
