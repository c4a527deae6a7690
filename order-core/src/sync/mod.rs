//! Sync - live, minimally churning views of the order collection
//!
//! - [`diff`] / [`apply_patch`]: ordered insert/update/remove/move patches
//!   between two delivered lists
//! - [`OrderSyncEngine`]: debounces store notifications per subscription and
//!   delivers patches on a single callback task

pub mod diff;
pub mod engine;

pub use diff::{PatchError, PatchOp, apply_patch, diff, same_content};
pub use engine::{DEFAULT_DEBOUNCE, OrderPatch, OrderSubscription, OrderSyncEngine};
