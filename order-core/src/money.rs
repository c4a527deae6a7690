//! Money and quantity bounds
//!
//! Rounding lives in `shared::order::money`; this module holds the limits the
//! engine enforces on caller input before anything is priced or persisted.

use rust_decimal::Decimal;
use shared::order::money::round_money;

use crate::orders::OrderError;
use crate::selection::ValidationError;

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Maximum length of a free-text cooking note, in characters
pub const MAX_NOTE_LEN: usize = 200;

/// Quantity accepted by the builder (0 means "remove the line")
pub fn validate_quantity(item_id: &str, quantity: i32) -> Result<(), ValidationError> {
    if !(0..=MAX_QUANTITY).contains(&quantity) {
        return Err(ValidationError::InvalidQuantity {
            item: item_id.to_string(),
            quantity,
        });
    }
    Ok(())
}

/// Trims a note; blank notes become `None`
pub fn normalize_note(note: &str) -> Result<Option<String>, ValidationError> {
    let trimmed = note.trim();
    if trimmed.chars().count() > MAX_NOTE_LEN {
        return Err(ValidationError::NoteTooLong { max: MAX_NOTE_LEN });
    }
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Validates an order-level discount against the pre-discount total
///
/// Returns the amount rounded to the currency's minimum unit.
pub fn validate_discount(amount: Decimal, gross_total: Decimal) -> Result<Decimal, OrderError> {
    let amount = round_money(amount);
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(OrderError::InvalidDiscount(format!(
            "discount must be non-negative, got {}",
            amount
        )));
    }
    if amount > gross_total {
        return Err(OrderError::InvalidDiscount(format!(
            "discount {} exceeds order total {}",
            amount, gross_total
        )));
    }
    Ok(amount)
}
