//! In-process order store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared::order::{Order, OrderFilter};
use tokio::sync::broadcast;

use super::{
    CHANGE_CHANNEL_CAPACITY, OrderChange, OrderStore, StoreError, StoreResult, wrapping_successor,
};

/// Order store held entirely in memory
///
/// Can be switched offline to exercise failure paths.
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
    counters: Mutex<HashMap<String, u64>>,
    online: AtomicBool,
    tx: broadcast::Sender<OrderChange>,
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            orders: RwLock::new(HashMap::new()),
            counters: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
            tx,
        }
    }

    /// While offline every operation fails with [`StoreError::Unavailable`]
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".into()))
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        self.ensure_online()?;
        Ok(self.orders.read().get(order_id).cloned())
    }

    async fn put_order(&self, order: &Order) -> StoreResult<()> {
        self.ensure_online()?;
        self.orders
            .write()
            .insert(order.order_id.clone(), order.clone());
        let _ = self.tx.send(OrderChange {
            order: order.clone(),
        });
        Ok(())
    }

    async fn query_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        self.ensure_online()?;
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        filter.sort(&mut orders);
        Ok(orders)
    }

    async fn read_counter(&self, key: &str) -> StoreResult<u64> {
        self.ensure_online()?;
        Ok(self.counters.lock().get(key).copied().unwrap_or(0))
    }

    async fn compare_and_set_counter(
        &self,
        key: &str,
        expected: u64,
        next: u64,
    ) -> StoreResult<bool> {
        self.ensure_online()?;
        let mut counters = self.counters.lock();
        let current = counters.get(key).copied().unwrap_or(0);
        if current != expected {
            return Ok(false);
        }
        counters.insert(key.to_string(), next);
        Ok(true)
    }

    async fn increment_counter_wrapping(&self, key: &str, max: u32) -> StoreResult<Option<u32>> {
        self.ensure_online()?;
        let mut counters = self.counters.lock();
        let counter = counters.entry(key.to_string()).or_insert(0);
        let next = wrapping_successor(*counter, max);
        *counter = u64::from(next);
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
    use shared::order::OrderType;

    fn order(id: &str, created_at: i64) -> Order {
        Order::new(id, 1, OrderType::Online, vec![], Decimal::ZERO, Decimal::ZERO, created_at)
    }

    #[tokio::test]
    async fn test_put_get_and_notify() {
        let store = MemoryOrderStore::new();
        let mut rx = store.subscribe();

        store.put_order(&order("a", 1)).await.unwrap();
        assert_eq!(store.get_order("a").await.unwrap().unwrap().order_id, "a");
        assert!(store.get_order("b").await.unwrap().is_none());
        assert_eq!(rx.recv().await.unwrap().order.order_id, "a");
    }

    #[tokio::test]
    async fn test_compare_and_set() {
        let store = MemoryOrderStore::new();
        assert_eq!(store.read_counter("k").await.unwrap(), 0);
        assert!(store.compare_and_set_counter("k", 0, 1).await.unwrap());
        assert!(!store.compare_and_set_counter("k", 0, 2).await.unwrap());
        assert_eq!(store.read_counter("k").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_counter_wrapping() {
        let store = MemoryOrderStore::new();
        assert_eq!(store.increment_counter_wrapping("k", 2).await.unwrap(), Some(1));
        assert_eq!(store.increment_counter_wrapping("k", 2).await.unwrap(), Some(2));
        assert_eq!(store.increment_counter_wrapping("k", 2).await.unwrap(), Some(1));

        store.set_online(false);
        assert!(matches!(
            store.increment_counter_wrapping("k", 2).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_fails_visibly() {
        let store = MemoryOrderStore::new();
        store.set_online(false);
        assert!(matches!(
            store.put_order(&order("a", 1)).await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_online(true);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_query_filters_and_sorts() {
        let store = MemoryOrderStore::new();
        store.put_order(&order("b", 2)).await.unwrap();
        store.put_order(&order("a", 1)).await.unwrap();
        let mut done = order("c", 3);
        done.transition_to(shared::order::OrderStatus::Cancelled, 4).unwrap();
        store.put_order(&done).await.unwrap();

        let kitchen = store.query_orders(&OrderFilter::Kitchen).await.unwrap();
        let ids: Vec<_> = kitchen.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(store.query_orders(&OrderFilter::All).await.unwrap().len(), 3);
    }
}
