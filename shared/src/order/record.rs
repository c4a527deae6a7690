//! Order record - persisted order document and its status state machine
//!
//! Totals are derived, never written directly: every line or discount
//! mutation goes through a method that re-runs [`Order::recalculate`], so
//! `subtotal == Σ line.total_price` and
//! `total == subtotal + tax + service_charge - discount` always hold.

use super::line::OrderLine;
use super::money::apply_rate;
use super::types::{OrderType, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order status
///
/// ```text
/// pending ──► preparing ──► ready ──► completed
///    │            │
///    └────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// No transition leaves a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Line edits and discounts are only accepted before the kitchen finishes
    pub fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }

    /// Whether `self -> next` is a legal, forward-only transition
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Preparing)
                | (Preparing, Ready)
                | (Ready, Completed)
                | (Pending, Cancelled)
                | (Preparing, Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected status change; the order is left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    /// Human-facing sequence number (1..=1000, wraps)
    pub order_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    pub order_type: OrderType,
    items: Vec<OrderLine>,
    status: OrderStatus,
    subtotal: Decimal,
    tax: Decimal,
    service_charge: Decimal,
    discount: Decimal,
    total: Decimal,
    /// Rates captured at creation so edits price consistently
    #[serde(default)]
    tax_rate: Decimal,
    #[serde(default)]
    service_charge_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    updated_at: i64,
}

impl Order {
    /// Create a new `pending` order and compute its totals
    pub fn new(
        order_id: impl Into<String>,
        order_number: u32,
        order_type: OrderType,
        items: Vec<OrderLine>,
        tax_rate: Decimal,
        service_charge_rate: Decimal,
        now: i64,
    ) -> Self {
        let mut order = Self {
            order_id: order_id.into(),
            order_number,
            user_id: None,
            table_number: None,
            order_type,
            items,
            status: OrderStatus::Pending,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            service_charge: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            tax_rate,
            service_charge_rate,
            payment_method: None,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        order.recalculate();
        order
    }

    // ========== Accessors ==========

    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn service_charge(&self) -> Decimal {
        self.service_charge
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn service_charge_rate(&self) -> Decimal {
        self.service_charge_rate
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Total before the discount is taken off
    pub fn gross_total(&self) -> Decimal {
        self.subtotal + self.tax + self.service_charge
    }

    // ========== Mutations ==========

    /// Replace the line list and recompute totals (status untouched)
    pub fn replace_items(&mut self, items: Vec<OrderLine>, now: i64) {
        self.items = items;
        self.recalculate();
        self.touch(now);
    }

    /// Set the order-level discount and recompute totals
    pub fn set_discount(&mut self, discount: Decimal, now: i64) {
        self.discount = discount;
        self.recalculate();
        self.touch(now);
    }

    /// Move to `next` if the state machine allows it
    ///
    /// Returns the previous status.
    pub fn transition_to(
        &mut self,
        next: OrderStatus,
        now: i64,
    ) -> Result<OrderStatus, InvalidTransition> {
        let from = self.status;
        if !from.can_transition_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        self.status = next;
        self.touch(now);
        Ok(from)
    }

    /// Re-derive every line total and the order totals
    pub fn recalculate(&mut self) {
        for line in &mut self.items {
            line.recompute();
        }
        self.subtotal = self.items.iter().map(OrderLine::total_price).sum();
        self.tax = apply_rate(self.subtotal, self.tax_rate);
        self.service_charge = apply_rate(self.subtotal, self.service_charge_rate);
        self.total = self.subtotal + self.tax + self.service_charge - self.discount;
    }

    /// Update timestamp strictly increases on every mutation
    fn touch(&mut self, now: i64) {
        self.updated_at = now.max(self.updated_at + 1);
    }
}
