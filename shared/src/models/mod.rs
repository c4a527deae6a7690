//! Catalog models
//!
//! Read-only records served by the catalog. The ordering core never mutates
//! them; availability flags may change between reads.

pub mod item;
pub mod modifier;

// Re-exports
pub use item::*;
pub use modifier::*;
