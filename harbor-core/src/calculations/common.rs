//! Common utility functions for tax calculations.
//!
//! The engine keeps every intermediate value unrounded; these helpers are
//! applied only when a value is presented.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use harbor_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole number, sending exact halves toward positive infinity.
///
/// `2.5` becomes `3` and `-2.5` becomes `-2`. Saturates at
/// `Decimal::MAX`, which is already whole.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use harbor_core::calculations::common::round_whole_half_up;
///
/// assert_eq!(round_whole_half_up(dec!(6250.5)), dec!(6251));
/// assert_eq!(round_whole_half_up(dec!(-2.5)), dec!(-2));
/// ```
pub fn round_whole_half_up(value: Decimal) -> Decimal {
    value.saturating_add(Decimal::new(5, 1)).floor()
}

/// Clamps a value to zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use harbor_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
