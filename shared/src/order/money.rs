//! Decimal rounding shared by order records

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounding strategy for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Round to the currency's minimum unit
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount * rate`, rounded to the currency's minimum unit
#[inline]
pub fn apply_rate(amount: Decimal, rate: Decimal) -> Decimal {
    round_money(amount * rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_money(Decimal::new(1004, 3)), Decimal::new(100, 2));
        assert_eq!(round_money(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
    }

    #[test]
    fn test_apply_rate() {
        // 29.00 * 10% = 2.90
        assert_eq!(
            apply_rate(Decimal::new(2900, 2), Decimal::new(10, 2)),
            Decimal::new(290, 2)
        );
        // 10.99 * 7.5% = 0.824250 -> 0.82
        assert_eq!(
            apply_rate(Decimal::new(1099, 2), Decimal::new(75, 3)),
            Decimal::new(82, 2)
        );
    }
}
