//! OrderService - the surface staff, kitchen and customer views call
//!
//! Composition reads go through the injected [`Catalog`] (which may itself
//! fall back to bundled data). Writes go to the injected [`OrderStore`] only
//! and are never retried against a fallback: a failed write surfaces to the
//! caller untouched.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use rust_decimal::Decimal;
use shared::order::{Order, OrderFilter, OrderStatus};
use shared::util::now_millis;
use uuid::Uuid;

use super::assembler::{OrderAssembler, OrderDraft, OrderRates, ResolvedLine};
use super::error::{OrderError, OrderResult};
use super::lifecycle::OrderLifecycle;
use super::sequence::SequenceAllocator;
use super::storage::OrderStore;
use crate::catalog::Catalog;
use crate::core::Config;
use crate::selection::{LineSelection, PricingPolicy, SelectionBuilder, SelectionValidator, ValidationError};
use crate::sync::{OrderPatch, OrderSubscription, OrderSyncEngine};

pub struct OrderService {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn OrderStore>,
    policy: PricingPolicy,
    rates: OrderRates,
    assembler: OrderAssembler,
    lifecycle: OrderLifecycle,
    sequence: SequenceAllocator,
    sync: OrderSyncEngine,
}

impl OrderService {
    pub fn new(catalog: Arc<dyn Catalog>, store: Arc<dyn OrderStore>, config: &Config) -> Self {
        let policy = config.pricing_policy();
        Self {
            assembler: OrderAssembler::new(policy),
            lifecycle: OrderLifecycle::new(store.clone()),
            sequence: SequenceAllocator::with_limits(
                store.clone(),
                config.order_number_max,
                config.counter_max_attempts,
            ),
            sync: OrderSyncEngine::with_debounce(
                store.clone(),
                Duration::from_millis(config.sync_debounce_ms),
            ),
            rates: config.order_rates(),
            policy,
            catalog,
            store,
        }
    }

    /// Service with default policy, rates and limits
    pub fn with_defaults(catalog: Arc<dyn Catalog>, store: Arc<dyn OrderStore>) -> Self {
        Self {
            assembler: OrderAssembler::default(),
            lifecycle: OrderLifecycle::new(store.clone()),
            sequence: SequenceAllocator::new(store.clone()),
            sync: OrderSyncEngine::new(store.clone()),
            rates: OrderRates::default(),
            policy: PricingPolicy::default(),
            catalog,
            store,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    pub fn rates(&self) -> OrderRates {
        self.rates
    }

    // ========== Composition ==========

    /// Fresh builder for one customer session
    pub fn build_selection(&self) -> SelectionBuilder {
        SelectionBuilder::new(self.policy)
    }

    /// Look up the item and groups a selection refers to
    pub async fn resolve(&self, selection: &LineSelection) -> OrderResult<ResolvedLine> {
        let item = self.catalog.get_item(&selection.item_id).await?;
        let groups = self.catalog.get_modifier_groups(&item).await?;
        Ok(ResolvedLine {
            selection: selection.clone(),
            item,
            groups,
        })
    }

    pub async fn resolve_all(&self, selections: &[LineSelection]) -> OrderResult<Vec<ResolvedLine>> {
        try_join_all(selections.iter().map(|s| self.resolve(s))).await
    }

    /// First violation of one line against the current catalog
    pub async fn validate_selection(&self, selection: &LineSelection) -> OrderResult<()> {
        let line = self.resolve(selection).await?;
        SelectionValidator.validate(&line.selection, &line.item, &line.groups)?;
        Ok(())
    }

    /// Every violation of one line against the current catalog
    pub async fn validate_selection_all(
        &self,
        selection: &LineSelection,
    ) -> OrderResult<Vec<ValidationError>> {
        let line = self.resolve(selection).await?;
        Ok(SelectionValidator.validate_all(&line.selection, &line.item, &line.groups))
    }

    // ========== Orders ==========

    /// Validate, number and persist a new `pending` order
    ///
    /// The order number is allocated only after every line validated. It is
    /// consumed even if the final write fails.
    pub async fn assemble_order(
        &self,
        draft: OrderDraft,
        selections: &[LineSelection],
    ) -> OrderResult<Order> {
        if selections.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        let resolved = self.resolve_all(selections).await?;
        let order_id = Uuid::new_v4().to_string();
        let lines = self.assembler.freeze_lines(&order_id, &resolved)?;

        let order_number = self.sequence.next().await?;
        let order = self.assembler.build_order(
            order_id,
            order_number,
            draft,
            lines,
            self.rates,
            now_millis(),
        );
        self.store.put_order(&order).await?;

        tracing::info!(
            order_id = %order.order_id,
            order_number,
            lines = order.items().len(),
            total = %order.total(),
            "Order created"
        );
        Ok(order)
    }

    pub async fn transition_status(&self, order_id: &str, next: OrderStatus) -> OrderResult<Order> {
        self.lifecycle.transition(order_id, next).await
    }

    /// Replace an editable order's lines with freshly validated selections
    pub async fn edit_order(&self, order_id: &str, selections: &[LineSelection]) -> OrderResult<Order> {
        if selections.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        let resolved = self.resolve_all(selections).await?;
        let lines = self.assembler.freeze_lines(order_id, &resolved)?;
        self.lifecycle.edit_lines(order_id, lines).await
    }

    pub async fn apply_discount(&self, order_id: &str, amount: Decimal) -> OrderResult<Order> {
        self.lifecycle.apply_discount(order_id, amount).await
    }

    pub async fn get_order(&self, order_id: &str) -> OrderResult<Order> {
        self.lifecycle.load(order_id).await
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> OrderResult<Vec<Order>> {
        Ok(self.store.query_orders(filter).await?)
    }

    // ========== Observation ==========

    /// Start a debounced, diffed view of the orders matching `filter`
    pub async fn subscribe_orders<F>(
        &self,
        filter: OrderFilter,
        on_patch: F,
    ) -> OrderResult<OrderSubscription>
    where
        F: FnMut(OrderPatch) + Send + 'static,
    {
        Ok(self.sync.subscribe(filter, on_patch).await?)
    }
}
