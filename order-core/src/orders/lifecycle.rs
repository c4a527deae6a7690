//! Order lifecycle - status transitions and in-place edits of stored orders
//!
//! Every operation loads the current document, mutates it through the
//! `Order` methods (which keep totals and timestamps consistent) and writes
//! it back. Concurrent edits of the same order are last-write-wins.

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::order::{Order, OrderLine, OrderStatus};
use shared::util::now_millis;

use super::error::{OrderError, OrderResult};
use super::storage::OrderStore;
use crate::money::validate_discount;

#[derive(Clone)]
pub struct OrderLifecycle {
    store: Arc<dyn OrderStore>,
}

impl OrderLifecycle {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, order_id: &str) -> OrderResult<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Move an order along the status state machine
    pub async fn transition(&self, order_id: &str, next: OrderStatus) -> OrderResult<Order> {
        let mut order = self.load(order_id).await?;
        let from = order.transition_to(next, now_millis())?;
        self.store.put_order(&order).await?;

        tracing::info!(
            order_id = %order.order_id,
            order_number = order.order_number,
            from = %from,
            to = %next,
            "Order status changed"
        );
        Ok(order)
    }

    /// Replace the line list of an editable order
    ///
    /// An existing discount larger than the new pre-discount total is
    /// reduced to that total.
    pub async fn edit_lines(&self, order_id: &str, lines: Vec<OrderLine>) -> OrderResult<Order> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        let mut order = self.load(order_id).await?;
        Self::ensure_editable(&order)?;

        let now = now_millis();
        order.replace_items(lines, now);
        if order.discount() > order.gross_total() {
            tracing::debug!(
                order_id = %order.order_id,
                discount = %order.discount(),
                gross_total = %order.gross_total(),
                "Discount clamped after edit"
            );
            order.set_discount(order.gross_total(), now);
        }
        self.store.put_order(&order).await?;

        tracing::info!(
            order_id = %order.order_id,
            lines = order.items().len(),
            total = %order.total(),
            "Order lines replaced"
        );
        Ok(order)
    }

    /// Set the order-level discount
    pub async fn apply_discount(&self, order_id: &str, amount: Decimal) -> OrderResult<Order> {
        let mut order = self.load(order_id).await?;
        Self::ensure_editable(&order)?;

        let amount = validate_discount(amount, order.gross_total())?;
        order.set_discount(amount, now_millis());
        self.store.put_order(&order).await?;

        tracing::info!(
            order_id = %order.order_id,
            discount = %amount,
            total = %order.total(),
            "Discount applied"
        );
        Ok(order)
    }

    fn ensure_editable(order: &Order) -> OrderResult<()> {
        if order.status().is_editable() {
            Ok(())
        } else {
            Err(OrderError::NotEditable {
                status: order.status(),
            })
        }
    }
}
