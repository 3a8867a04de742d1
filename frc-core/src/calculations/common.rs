//! Shared helpers for the withholding and aggregation calculations.

use rust_decimal::Decimal;

/// Rounds a monetary value to two decimal places using half-up rounding.
///
/// This is the single rounding rule used across the crate. Midpoints round
/// away from zero (0.005 → 0.01), matching standard currency rounding for
/// BRL amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use frc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(169.444)), dec!(169.44));
/// assert_eq!(round_half_up(dec!(169.445)), dec!(169.45));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
