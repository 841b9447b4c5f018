//! Shared helpers for the payroll calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to a whole currency unit, halves away from zero.
///
/// Every monetary output is rounded once with this function; intermediate
/// values are never rounded.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(123.4)), dec!(123));
/// assert_eq!(round_whole(dec!(123.5)), dec!(124));
/// assert_eq!(round_whole(dec!(-123.5)), dec!(-124)); // Away from zero
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value` when positive, otherwise zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Amount of `amount` that falls under `cap`.
pub fn capped(
    amount: Decimal,
    cap: Decimal,
) -> Decimal {
    amount.min(cap)
}
