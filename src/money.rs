//! Money helpers
//!
//! Amounts are rendered with `rusty_money`'s `Display`, which knows each
//! currency's symbol and exponent.

/// Sum amounts in minor units, saturating instead of overflowing.
pub fn saturating_sum_minor(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0_i64, i64::saturating_add)
}
