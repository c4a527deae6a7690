//! Selection validation errors

use shared::error::ErrorCode;
use thiserror::Error;

/// A selection problem the caller can correct and retry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A choice is required for {group}")]
    MissingRequiredSelection { group: String },

    #[error("Select at least {min} option(s) for {group}")]
    BelowMinimum { group: String, min: i32 },

    #[error("Select at most {max} option(s) for {group}")]
    AboveMaximum { group: String, max: i32 },

    #[error("Option {option} in {group} is not available")]
    OptionUnavailable { group: String, option: String },

    #[error("Option {option} does not exist in {group}")]
    UnknownOption { group: String, option: String },

    #[error("Item {item} does not offer modifier group {group}")]
    UnknownGroup { item: String, group: String },

    #[error("Item {0} does not include a drink")]
    NotADrink(String),

    #[error("Item {0} is not available")]
    ItemUnavailable(String),

    #[error("Item {item}: requested {requested}, only {available} left")]
    InsufficientStock {
        item: String,
        requested: i32,
        available: i32,
    },

    #[error("Invalid quantity {quantity} for item {item}")]
    InvalidQuantity { item: String, quantity: i32 },

    #[error("No line for item {0}")]
    LineNotFound(String),

    #[error("Note exceeds {max} characters")]
    NoteTooLong { max: usize },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingRequiredSelection { .. } => ErrorCode::RequiredSelectionMissing,
            ValidationError::BelowMinimum { .. } => ErrorCode::SelectionBelowMinimum,
            ValidationError::AboveMaximum { .. } => ErrorCode::SelectionAboveMaximum,
            ValidationError::OptionUnavailable { .. } => ErrorCode::OptionUnavailable,
            ValidationError::UnknownOption { .. } => ErrorCode::OptionNotFound,
            ValidationError::UnknownGroup { .. } => ErrorCode::ModifierGroupNotFound,
            ValidationError::NotADrink(_) => ErrorCode::NotADrinkItem,
            ValidationError::ItemUnavailable(_) => ErrorCode::ItemUnavailable,
            ValidationError::InsufficientStock { .. } => ErrorCode::ItemOutOfStock,
            ValidationError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            ValidationError::LineNotFound(_) => ErrorCode::NotFound,
            ValidationError::NoteTooLong { .. } => ErrorCode::NoteTooLong,
        }
    }
}
