//! redb-based order store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | JSON `Order` | Order documents |
//! | `counters` | counter name | `u64` | Shared counters (order number) |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with an atomic pointer swap), so an allocated order number survives a
//! crash even if the order write that follows it does not.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::order::{Order, OrderFilter};
use tokio::sync::broadcast;

use super::{CHANGE_CHANNEL_CAPACITY, OrderChange, OrderStore, StoreResult, wrapping_successor};

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for counters: key = counter name, value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Order store backed by redb
#[derive(Clone)]
pub struct RedbOrderStore {
    db: Arc<Database>,
    tx: broadcast::Sender<OrderChange>,
}

impl RedbOrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a database backed by memory only
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            db: Arc::new(db),
            tx,
        })
    }

    /// Number of stored orders
    pub fn count_orders(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.len()?)
    }
}

#[async_trait]
impl OrderStore for RedbOrderStore {
    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    async fn put_order(&self, order: &Order) -> StoreResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            table.insert(order.order_id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;

        let _ = self.tx.send(OrderChange {
            order: order.clone(),
        });
        Ok(())
    }

    async fn query_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let order: Order = serde_json::from_slice(value.value())?;
            if filter.matches(&order) {
                orders.push(order);
            }
        }
        filter.sort(&mut orders);
        Ok(orders)
    }

    async fn read_counter(&self, key: &str) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(key)?.map(|g| g.value()).unwrap_or(0))
    }

    async fn compare_and_set_counter(
        &self,
        key: &str,
        expected: u64,
        next: u64,
    ) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(key)?.map(|g| g.value()).unwrap_or(0);
        if current != expected {
            drop(table);
            txn.abort()?;
            return Ok(false);
        }
        table.insert(key, next)?;
        drop(table);
        txn.commit()?;
        Ok(true)
    }

    async fn increment_counter_wrapping(&self, key: &str, max: u32) -> StoreResult<Option<u32>> {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(key)?.map(|g| g.value()).unwrap_or(0);
        let next = wrapping_successor(current, max);
        table.insert(key, u64::from(next))?;
        drop(table);
        txn.commit()?;
        Ok(Some(next))
    }

    fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::order::{OrderLine, OrderStatus, OrderType};

    fn order(id: &str, created_at: i64) -> Order {
        let lines = vec![OrderLine::new("burger", "Burger", 2, Decimal::new(1450, 2))];
        Order::new(id, 7, OrderType::Table, lines, Decimal::new(10, 2), Decimal::ZERO, created_at)
    }

    #[tokio::test]
    async fn test_round_trip_in_memory() {
        let store = RedbOrderStore::open_in_memory().unwrap();
        let o = order("o-1", 1_000);
        store.put_order(&o).await.unwrap();

        let loaded = store.get_order("o-1").await.unwrap().unwrap();
        assert_eq!(loaded, o);
        assert_eq!(loaded.total(), Decimal::new(3190, 2));
        assert!(store.get_order("missing").await.unwrap().is_none());
        assert_eq!(store.count_orders().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counter_compare_and_set() {
        let store = RedbOrderStore::open_in_memory().unwrap();
        assert_eq!(store.read_counter("order_number").await.unwrap(), 0);
        assert!(store.compare_and_set_counter("order_number", 0, 1).await.unwrap());
        assert!(!store.compare_and_set_counter("order_number", 0, 5).await.unwrap());
        assert_eq!(store.read_counter("order_number").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_counter_wrapping() {
        let store = RedbOrderStore::open_in_memory().unwrap();
        let mut numbers = Vec::new();
        for _ in 0..4 {
            numbers.push(store.increment_counter_wrapping("order_number", 3).await.unwrap());
        }
        assert_eq!(numbers, [Some(1), Some(2), Some(3), Some(1)]);
        assert_eq!(store.read_counter("order_number").await.unwrap(), 1);

        // a counter beyond a lowered max restarts the cycle
        assert!(store.compare_and_set_counter("order_number", 1, 900).await.unwrap());
        assert_eq!(
            store.increment_counter_wrapping("order_number", 10).await.unwrap(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.redb");
        {
            let store = RedbOrderStore::open(&path).unwrap();
            store.put_order(&order("o-1", 1)).await.unwrap();
            assert!(store.compare_and_set_counter("order_number", 0, 42).await.unwrap());
        }
        let store = RedbOrderStore::open(&path).unwrap();
        assert!(store.get_order("o-1").await.unwrap().is_some());
        assert_eq!(store.read_counter("order_number").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_query_and_broadcast() {
        let store = RedbOrderStore::open_in_memory().unwrap();
        let mut rx = store.subscribe();

        let mut ready = order("o-2", 2);
        ready.transition_to(OrderStatus::Preparing, 3).unwrap();
        ready.transition_to(OrderStatus::Ready, 4).unwrap();
        store.put_order(&order("o-1", 1)).await.unwrap();
        store.put_order(&ready).await.unwrap();

        let kitchen = store.query_orders(&OrderFilter::Kitchen).await.unwrap();
        assert_eq!(kitchen.len(), 1);
        let all = store.query_orders(&OrderFilter::All).await.unwrap();
        assert_eq!(all[0].order_id, "o-2");

        assert_eq!(rx.recv().await.unwrap().order.order_id, "o-1");
        assert_eq!(rx.recv().await.unwrap().order.order_id, "o-2");
    }
}
