//! Order store - the backing document store seen through a trait
//!
//! # Backends
//!
//! | Type | Durability | Use |
//! |------|-----------|-----|
//! | [`RedbOrderStore`] | on disk (or redb in-memory backend) | production, integration tests |
//! | [`MemoryOrderStore`] | process lifetime | unit tests, demos |
//!
//! Every successful [`OrderStore::put_order`] broadcasts an [`OrderChange`]
//! to subscribers; that stream is what the sync engine consumes.

mod memory;
mod redb_store;

pub use memory::MemoryOrderStore;
pub use redb_store::RedbOrderStore;

use async_trait::async_trait;
use shared::error::ErrorCode;
use shared::order::{Order, OrderFilter};
use thiserror::Error;
use tokio::sync::broadcast;

/// Broadcast buffer per store
pub const CHANGE_CHANNEL_CAPACITY: usize = 1024;

/// Change notification emitted after an order is written
#[derive(Debug, Clone)]
pub struct OrderChange {
    pub order: Order,
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store could not be reached; nothing was written
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Counter {key} still conflicting after {attempts} attempts")]
    RetriesExhausted { key: String, attempts: u32 },
}

impl StoreError {
    /// 将存储错误转换为错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Serialization(_) => ErrorCode::StorageCorrupted,
            StoreError::Unavailable(_) => ErrorCode::NetworkError,
            StoreError::RetriesExhausted { .. } => ErrorCode::SystemBusy,
            other => {
                // redb 错误通过字符串匹配分类
                let err_str = other.to_string().to_lowercase();
                if err_str.contains("corrupt") || err_str.contains("invalid database") {
                    ErrorCode::StorageCorrupted
                } else {
                    ErrorCode::DatabaseError
                }
            }
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Value that follows `current` in the cycle `1..=max`
pub fn wrapping_successor(current: u64, max: u32) -> u32 {
    if current >= u64::from(max) {
        1
    } else {
        // current < max <= u32::MAX
        current as u32 + 1
    }
}

/// Asynchronous order repository
///
/// Writes are last-write-wins per document. The only multi-writer
/// coordination is on counters: [`OrderStore::increment_counter_wrapping`]
/// and [`OrderStore::compare_and_set_counter`].
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>>;

    /// Insert or replace an order, then notify subscribers
    async fn put_order(&self, order: &Order) -> StoreResult<()>;

    /// Orders matching `filter`, in the filter's delivery order
    async fn query_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>>;

    /// Current counter value (`0` if never written)
    async fn read_counter(&self, key: &str) -> StoreResult<u64>;

    /// Atomically set `key` to `next` if it still holds `expected`
    ///
    /// Returns `false` without writing when the precondition fails.
    async fn compare_and_set_counter(&self, key: &str, expected: u64, next: u64)
    -> StoreResult<bool>;

    /// Advance `key` through `1..=max`, wrapping back to 1
    ///
    /// Returns the new value, or `None` when another writer moved the
    /// counter in between. Stores that can read and write in one
    /// transaction override this and never return `None`.
    async fn increment_counter_wrapping(&self, key: &str, max: u32) -> StoreResult<Option<u32>> {
        let current = self.read_counter(key).await?;
        let next = wrapping_successor(current, max);
        Ok(self
            .compare_and_set_counter(key, current, u64::from(next))
            .await?
            .then_some(next))
    }

    fn subscribe(&self) -> broadcast::Receiver<OrderChange>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            StoreError::RetriesExhausted {
                key: "order_number".into(),
                attempts: 5
            }
            .code(),
            ErrorCode::SystemBusy
        );
        assert_eq!(
            StoreError::Unavailable("offline".into()).code(),
            ErrorCode::NetworkError
        );
        let bad_json = serde_json::from_str::<Order>("{").unwrap_err();
        assert_eq!(
            StoreError::Serialization(bad_json).code(),
            ErrorCode::StorageCorrupted
        );
    }
}
