//! Common utility functions for tax calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to a whole currency unit using half-up rounding.
///
/// Values at exactly .5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use impot_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(487.85)), dec!(488));
/// assert_eq!(round_to_unit(dec!(3225.42)), dec!(3225));
/// assert_eq!(round_to_unit(dec!(6500.5)), dec!(6501));
/// assert_eq!(round_to_unit(dec!(-2.5)), dec!(-3)); // Away from zero
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
