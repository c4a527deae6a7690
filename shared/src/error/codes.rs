//! Unified error codes for the ordering core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog / selection errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderAlreadyCompleted = 4003,
    OrderAlreadyCancelled = 4004,
    OrderEmpty = 4007,
    /// Status change not allowed by the lifecycle
    InvalidStatusTransition = 4008,
    /// Lines can only be edited while pending or preparing
    OrderNotEditable = 4009,
    InvalidDiscount = 4010,

    // ==================== 6xxx: Catalog / Selection ====================
    ItemNotFound = 6001,
    ItemOutOfStock = 6003,
    ItemUnavailable = 6004,
    InvalidQuantity = 6005,
    CatalogUnavailable = 6010,
    ModifierGroupNotFound = 6301,
    OptionNotFound = 6305,
    OptionUnavailable = 6306,
    RequiredSelectionMissing = 6307,
    SelectionBelowMinimum = 6308,
    SelectionAboveMaximum = 6309,
    NotADrinkItem = 6310,
    NoteTooLong = 6311,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    NetworkError = 9003,
    ConfigError = 9005,

    // ==================== 94xx: Storage ====================
    StorageCorrupted = 9403,
    /// Transaction retries exhausted under contention
    SystemBusy = 9404,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::InvalidStatusTransition => "Order status change is not allowed",
            ErrorCode::OrderNotEditable => "Order can no longer be edited",
            ErrorCode::InvalidDiscount => "Discount amount is invalid",

            // Catalog / Selection
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::ItemOutOfStock => "Item is out of stock",
            ErrorCode::ItemUnavailable => "Item is not available",
            ErrorCode::InvalidQuantity => "Quantity is invalid",
            ErrorCode::CatalogUnavailable => "Catalog is unreachable",
            ErrorCode::ModifierGroupNotFound => "Modifier group not found",
            ErrorCode::OptionNotFound => "Option not found",
            ErrorCode::OptionUnavailable => "Option is not available",
            ErrorCode::RequiredSelectionMissing => "A required choice is missing",
            ErrorCode::SelectionBelowMinimum => "Too few options selected",
            ErrorCode::SelectionAboveMaximum => "Too many options selected",
            ErrorCode::NotADrinkItem => "Item does not include a drink",
            ErrorCode::NoteTooLong => "Note is too long",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",

            // Storage
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System is busy, please retry",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidStatusTransition),
            4009 => Ok(ErrorCode::OrderNotEditable),
            4010 => Ok(ErrorCode::InvalidDiscount),

            // Catalog / Selection
            6001 => Ok(ErrorCode::ItemNotFound),
            6003 => Ok(ErrorCode::ItemOutOfStock),
            6004 => Ok(ErrorCode::ItemUnavailable),
            6005 => Ok(ErrorCode::InvalidQuantity),
            6010 => Ok(ErrorCode::CatalogUnavailable),
            6301 => Ok(ErrorCode::ModifierGroupNotFound),
            6305 => Ok(ErrorCode::OptionNotFound),
            6306 => Ok(ErrorCode::OptionUnavailable),
            6307 => Ok(ErrorCode::RequiredSelectionMissing),
            6308 => Ok(ErrorCode::SelectionBelowMinimum),
            6309 => Ok(ErrorCode::SelectionAboveMaximum),
            6310 => Ok(ErrorCode::NotADrinkItem),
            6311 => Ok(ErrorCode::NoteTooLong),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),

            // Storage
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderEmpty.code(), 4007);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4008);
        assert_eq!(ErrorCode::OptionUnavailable.code(), 6306);
        assert_eq!(ErrorCode::SelectionAboveMaximum.code(), 6309);
        assert_eq!(ErrorCode::SystemBusy.code(), 9404);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_round_trip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::OrderNotEditable,
            ErrorCode::InvalidDiscount,
            ErrorCode::ItemOutOfStock,
            ErrorCode::CatalogUnavailable,
            ErrorCode::RequiredSelectionMissing,
            ErrorCode::NoteTooLong,
            ErrorCode::DatabaseError,
            ErrorCode::StorageCorrupted,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderEmpty).unwrap();
        assert_eq!(json, "4007");
        let back: ErrorCode = serde_json::from_str("6307").unwrap();
        assert_eq!(back, ErrorCode::RequiredSelectionMissing);
        assert!(serde_json::from_str::<ErrorCode>("7777").is_err());
    }
}
