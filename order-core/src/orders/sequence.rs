//! Human-facing order number allocation
//!
//! Numbers cycle through `1..=max` and wrap back to 1. The store advances
//! the shared counter record; stores with write transactions do it in one
//! step, others fall back to read plus compare-and-set and report a lost
//! race, which is retried. A stored value of `0` means nothing has been
//! allocated yet.

use std::sync::Arc;

use super::storage::{OrderStore, StoreError, StoreResult, wrapping_successor};

/// Counter record key
pub const ORDER_NUMBER_KEY: &str = "order_number";

pub const DEFAULT_ORDER_NUMBER_MAX: u32 = 1000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Allocates order numbers from the store's shared counter
#[derive(Clone)]
pub struct SequenceAllocator {
    store: Arc<dyn OrderStore>,
    max: u32,
    max_attempts: u32,
}

impl SequenceAllocator {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self::with_limits(store, DEFAULT_ORDER_NUMBER_MAX, DEFAULT_MAX_ATTEMPTS)
    }

    /// `max` and `max_attempts` are clamped to at least 1
    pub fn with_limits(store: Arc<dyn OrderStore>, max: u32, max_attempts: u32) -> Self {
        Self {
            store,
            max: max.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Number that follows `current` in the cycle
    pub fn successor(current: u64, max: u32) -> u32 {
        wrapping_successor(current, max)
    }

    /// Allocate the next number
    pub async fn next(&self) -> StoreResult<u32> {
        for attempt in 1..=self.max_attempts {
            if let Some(next) = self
                .store
                .increment_counter_wrapping(ORDER_NUMBER_KEY, self.max)
                .await?
            {
                return Ok(next);
            }
            tracing::debug!(attempt, "Order number counter conflict, retrying");
            tokio::task::yield_now().await;
        }

        tracing::warn!(
            attempts = self.max_attempts,
            "Order number allocation gave up under contention"
        );
        Err(StoreError::RetriesExhausted {
            key: ORDER_NUMBER_KEY.to_string(),
            attempts: self.max_attempts,
        })
    }
}
