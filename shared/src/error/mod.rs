//! Unified error codes
//!
//! - [`ErrorCode`]: Standardized numeric codes for every failure the core can
//!   surface
//! - [`ErrorCategory`]: Classification of codes by range
//!
//! Service crates keep their own `thiserror` enums and map each variant to an
//! [`ErrorCode`] at the boundary, so surfaces can localize and branch on a
//! stable number instead of a message string.
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorCategory, ErrorCode};
//!
//! let code = ErrorCode::OrderEmpty;
//! assert_eq!(code.code(), 4007);
//! assert_eq!(code.category(), ErrorCategory::Order);
//! ```

mod category;
mod codes;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
