//! Debounced order subscriptions
//!
//! Each subscription runs three tasks connected by channels:
//!
//! ```text
//! store broadcast ─► collector ─(sorted list)─► differ ─(patch)─► delivery ─► on_patch
//! ```
//!
//! - **collector** keeps the filtered working set and flushes it once the
//!   debounce window passes without a new change
//! - **differ** diffs the newest flushed list against the last delivered one;
//!   the hand-off is a `watch`, so a list not yet picked up is replaced by
//!   the next flush instead of queueing behind it
//! - **delivery** is the single task that invokes the callback, so patches
//!   of one subscription are totally ordered; at most one patch waits for a
//!   slow callback
//!
//! Cancelling the subscription stops the debounce timer and drops the store
//! receiver; [`OrderSubscription::shutdown`] also waits for the tasks, after
//! which no callback can fire.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use shared::order::{Order, OrderFilter};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::diff::{PatchOp, diff};
use crate::orders::storage::{OrderChange, OrderStore, StoreResult};

/// Quiet period before a burst of changes is flushed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Patches buffered ahead of the callback
const PATCH_BUFFER: usize = 1;

/// One delivered update
#[derive(Debug, Clone)]
pub struct OrderPatch {
    pub subscription_id: u64,
    /// Starts at 1, increases by one per delivered patch
    pub revision: u64,
    /// Ops turning the previous snapshot into `orders`
    pub ops: Vec<PatchOp>,
    /// Full snapshot after the patch, in filter order
    pub orders: Vec<Order>,
}

/// Creates debounced, diffed subscriptions over an [`OrderStore`]
pub struct OrderSyncEngine {
    store: Arc<dyn OrderStore>,
    debounce: Duration,
    next_id: AtomicU64,
}

impl OrderSyncEngine {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self::with_debounce(store, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(store: Arc<dyn OrderStore>, debounce: Duration) -> Self {
        Self {
            store,
            debounce,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Subscribe to the orders matching `filter`
    ///
    /// The current result set is delivered right away as the first patch
    /// (when non-empty); later changes are debounced.
    pub async fn subscribe<F>(&self, filter: OrderFilter, on_patch: F) -> StoreResult<OrderSubscription>
    where
        F: FnMut(OrderPatch) + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // Subscribe before the initial query so no change falls in between
        let changes = self.store.subscribe();
        let initial = self.store.query_orders(&filter).await?;

        let token = CancellationToken::new();
        let (list_tx, list_rx) = watch::channel(Vec::new());
        let (patch_tx, patch_rx) = mpsc::channel(PATCH_BUFFER);

        let collector = Collector {
            subscription_id: id,
            filter: filter.clone(),
            store: self.store.clone(),
            debounce: self.debounce,
            token: token.clone(),
            working: HashMap::new(),
            seen: HashMap::new(),
            out: list_tx,
        };

        let tasks = vec![
            tokio::spawn(collector.run(initial, changes)),
            tokio::spawn(run_differ(id, list_rx, patch_tx, token.clone())),
            tokio::spawn(run_delivery(patch_rx, on_patch, token.clone())),
        ];

        tracing::info!(subscription_id = id, filter = ?filter, "Order subscription started");
        Ok(OrderSubscription {
            id,
            filter,
            token,
            tasks: Mutex::new(tasks),
        })
    }
}

/// Handle to a live subscription
///
/// Dropping the handle cancels the subscription.
pub struct OrderSubscription {
    id: u64,
    filter: OrderFilter,
    token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl OrderSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop the subscription; safe to call repeatedly and from any thread
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::info!(subscription_id = self.id, "Order subscription cancelled");
        }
        self.token.cancel();
    }

    /// Cancel and wait until every task has exited
    pub async fn shutdown(&self) {
        self.cancel();
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await
                && e.is_panic()
            {
                tracing::error!(subscription_id = self.id, "Subscription task panicked: {e}");
            }
        }
    }
}

impl Drop for OrderSubscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl std::fmt::Debug for OrderSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSubscription")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

// =============================================================================
// Tasks
// =============================================================================

struct Collector {
    subscription_id: u64,
    filter: OrderFilter,
    store: Arc<dyn OrderStore>,
    debounce: Duration,
    token: CancellationToken,
    /// Orders currently matching the filter
    working: HashMap<String, Order>,
    /// Newest version seen per order, matching or not
    seen: HashMap<String, Seen>,
    out: watch::Sender<Vec<Order>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seen {
    updated_at: i64,
    terminal: bool,
}

impl Collector {
    async fn run(mut self, initial: Vec<Order>, mut changes: broadcast::Receiver<OrderChange>) {
        self.reset(initial);
        if !self.flush() {
            return;
        }

        let mut deadline: Option<Instant> = None;
        loop {
            let sleep_until = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                biased;

                _ = self.token.cancelled() => break,

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    deadline = None;
                    tracing::debug!(
                        subscription_id = self.subscription_id,
                        orders = self.working.len(),
                        "Debounce window elapsed, flushing"
                    );
                    if !self.flush() {
                        break;
                    }
                }

                result = changes.recv() => {
                    match result {
                        Ok(change) => {
                            if self.apply(change.order) {
                                deadline = Some(Instant::now() + self.debounce);
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(
                                subscription_id = self.subscription_id,
                                "Subscription lagged {n} changes, re-querying"
                            );
                            match self.store.query_orders(&self.filter).await {
                                Ok(orders) => self.reset(orders),
                                Err(e) => tracing::error!(
                                    subscription_id = self.subscription_id,
                                    "Re-query after lag failed: {e}"
                                ),
                            }
                            deadline = Some(Instant::now() + self.debounce);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            if deadline.is_some() {
                                self.flush();
                            }
                            tracing::debug!(
                                subscription_id = self.subscription_id,
                                "Store change channel closed"
                            );
                            break;
                        }
                    }
                }
            }
        }
    }

    fn reset(&mut self, orders: Vec<Order>) {
        self.working.clear();
        for order in orders {
            self.note_seen(&order);
            if self.filter.matches(&order) {
                self.working.insert(order.order_id.clone(), order);
            }
        }
    }

    /// Fold one change into the working set; `true` if the view may change
    fn apply(&mut self, order: Order) -> bool {
        if let Some(newest) = self.seen.get(&order.order_id)
            && newest.updated_at > order.updated_at()
        {
            // out-of-order notification for an older version
            return false;
        }
        self.note_seen(&order);

        if self.filter.matches(&order) {
            self.working.insert(order.order_id.clone(), order);
            true
        } else {
            self.working.remove(&order.order_id).is_some()
        }
    }

    fn note_seen(&mut self, order: &Order) {
        let seen = Seen {
            updated_at: order.updated_at(),
            terminal: order.status().is_terminal(),
        };
        self.seen
            .entry(order.order_id.clone())
            .and_modify(|newest| {
                if seen.updated_at >= newest.updated_at {
                    *newest = seen;
                }
            })
            .or_insert(seen);
    }

    /// Forget finished orders that are outside the view
    ///
    /// Runs on flush, so a late older version still has one debounce
    /// window to be recognised as stale.
    fn prune_seen(&mut self) {
        let working = &self.working;
        self.seen
            .retain(|id, seen| !seen.terminal || working.contains_key(id));
    }

    /// Send the sorted working set downstream; `false` once the differ is gone
    fn flush(&mut self) -> bool {
        self.prune_seen();
        let mut orders: Vec<Order> = self.working.values().cloned().collect();
        self.filter.sort(&mut orders);
        self.out.send(orders).is_ok()
    }
}

async fn run_differ(
    subscription_id: u64,
    mut lists: watch::Receiver<Vec<Order>>,
    patches: mpsc::Sender<OrderPatch>,
    token: CancellationToken,
) {
    let mut delivered: Vec<Order> = Vec::new();
    let mut revision = 0u64;

    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            changed = lists.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
        let orders = lists.borrow_and_update().clone();
        let ops = diff(&delivered, &orders);
        if ops.is_empty() {
            continue;
        }
        revision += 1;
        tracing::debug!(subscription_id, revision, ops = ops.len(), "Patch computed");
        delivered = orders.clone();
        let patch = OrderPatch {
            subscription_id,
            revision,
            ops,
            orders,
        };
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            sent = patches.send(patch) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
}

async fn run_delivery<F>(
    mut patches: mpsc::Receiver<OrderPatch>,
    mut on_patch: F,
    token: CancellationToken,
) where
    F: FnMut(OrderPatch) + Send + 'static,
{
    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            patch = patches.recv() => match patch {
                Some(patch) if !token.is_cancelled() => on_patch(patch),
                _ => break,
            },
        }
    }
}
