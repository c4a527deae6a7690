//! Order Module
//!
//! This module provides the persisted order records:
//! - Lines: frozen, priced snapshots of one item and its modifiers
//! - Orders: line list, totals and lifecycle status
//! - Filters: the result sets observers subscribe to

pub mod filter;
pub mod line;
pub mod money;
pub mod record;
pub mod types;

// Re-exports
pub use filter::OrderFilter;
pub use line::OrderLine;
pub use record::{InvalidTransition, Order, OrderStatus};
pub use types::*;
