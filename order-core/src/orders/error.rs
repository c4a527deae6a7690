//! Order errors

use shared::error::ErrorCode;
use shared::order::{InvalidTransition, OrderStatus};
use thiserror::Error;

use super::storage::StoreError;
use crate::catalog::CatalogError;
use crate::selection::ValidationError;

/// Failures of assembly, transitions, edits and discounts
///
/// The order is never partially written when one of these is returned.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order has no items")]
    EmptyOrder,

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Order is {status} and can no longer be edited")]
    NotEditable { status: OrderStatus },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid discount: {0}")]
    InvalidDiscount(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, error_code = ?err.code(), "Storage error occurred");
        OrderError::Store(err)
    }
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::EmptyOrder => ErrorCode::OrderEmpty,
            OrderError::InvalidTransition(t) => match t.from {
                OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
                OrderStatus::Cancelled => ErrorCode::OrderAlreadyCancelled,
                _ => ErrorCode::InvalidStatusTransition,
            },
            OrderError::NotEditable { .. } => ErrorCode::OrderNotEditable,
            OrderError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            OrderError::InvalidDiscount(_) => ErrorCode::InvalidDiscount,
            OrderError::Validation(e) => e.code(),
            OrderError::Catalog(e) => e.code(),
            OrderError::Store(e) => e.code(),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_codes_by_origin() {
        let from_done = OrderError::from(InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Cancelled,
        });
        assert_eq!(from_done.code(), ErrorCode::OrderAlreadyCompleted);

        let backwards = OrderError::from(InvalidTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Pending,
        });
        assert_eq!(backwards.code(), ErrorCode::InvalidStatusTransition);
    }

    #[test]
    fn test_wrapped_codes_pass_through() {
        let err = OrderError::from(ValidationError::MissingRequiredSelection {
            group: "size".into(),
        });
        assert_eq!(err.code(), ErrorCode::RequiredSelectionMissing);

        let err = OrderError::from(StoreError::Unavailable("down".into()));
        assert_eq!(err.code(), ErrorCode::NetworkError);
        assert_eq!(OrderError::EmptyOrder.code(), ErrorCode::OrderEmpty);
    }
}
