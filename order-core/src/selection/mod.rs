//! Selection - a customer's in-progress choices
//!
//! - [`SelectionBuilder`]: accumulates lines, quantities, modifier and drink
//!   choices for one session
//! - [`SelectionValidator`]: gates a line's cardinality rules before it is
//!   frozen into an order
//! - [`PricingPolicy`]: additive price of a line's choices

pub mod builder;
pub mod error;
pub mod pricing;
pub mod validator;

pub use builder::{LineSelection, SelectionBuilder, SelectionChange, SelectionMode};
pub use error::ValidationError;
pub use pricing::PricingPolicy;
pub use validator::SelectionValidator;
