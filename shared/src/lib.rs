//! Shared types for the ordering core
//!
//! Plain data records used across crates: catalog items and modifier groups,
//! persisted order records, subscription filters and the unified error codes.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ErrorCategory, ErrorCode};
pub use models::{Item, ModifierGroup, ModifierOption};
pub use order::{
    DrinkTemperature, InvalidTransition, Order, OrderFilter, OrderLine, OrderStatus, OrderType,
    PaymentStatus,
};
pub use serde::{Deserialize, Serialize};
