//! Discount utilities
//!
//! Minor-unit arithmetic shared by the price resolver and the cart validator.
//! Every helper rounds half away from zero, which for the non-negative amounts
//! used here is ordinary half-up rounding.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Convert a [`Percentage`] into its underlying fraction (0.15 for 15%).
pub fn fraction(percent: &Percentage) -> Decimal {
    // decimal_percentage doesn't expose the underlying Decimal
    *percent * Decimal::ONE
}

/// Convert a [`Percentage`] into a fraction clamped to `0..=1`.
///
/// Negative percentages collapse to zero and anything above 100% collapses to
/// one, so a discount can never add to a price or push it below zero.
pub fn clamped_fraction(percent: &Percentage) -> Decimal {
    fraction(percent).clamp(Decimal::ZERO, Decimal::ONE)
}

/// Percent points (e.g. `15` for 15%) of a fraction, without rounding.
pub fn percent_points(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).normalize()
}

/// Calculate `fraction × minor`, rounded to whole minor units.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or
/// cannot be safely represented.
pub fn fraction_of_minor(fraction: Decimal, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    fraction
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Take `fraction` off `minor`, clamping the result at zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn minor_after_fraction_off(minor: i64, fraction: Decimal) -> Result<i64, DiscountError> {
    let off = fraction_of_minor(fraction, minor)?;

    minor
        .checked_sub(off)
        .map(|remaining| remaining.max(0))
        .ok_or(DiscountError::PercentConversion)
}

/// Whole-percent saving of `discounted` relative to `original`, both in minor units.
///
/// Returns zero when `original` is not positive or nothing was saved.
pub fn whole_percent_saving(original: i64, discounted: i64) -> u32 {
    if original <= 0 || discounted >= original {
        return 0;
    }

    let saved = Decimal::from(original) - Decimal::from(discounted.max(0));

    (saved / Decimal::from(original) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
