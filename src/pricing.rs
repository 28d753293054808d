//! Prices
//!
//! Resolves the single customer-facing price of a product from its base
//! price, an optional sale price and at most one promotional override.
//!
//! The floor price is chosen first, highest priority wins:
//!
//! 1. the override's promotional price, when below the base price;
//! 2. the sale price, when below the base price;
//! 3. the base price.
//!
//! Any additional percentage on the override is then taken off the floor
//! price (not the base price), so an "extra 10% off" stacks on top of an
//! existing markdown without counting it twice.
//!
//! [`resolve_price`] never fails. Dirty inputs are normalised instead: a
//! non-positive base price resolves to zero, sale or promotional prices at or
//! above the base price are ignored, and percentages are clamped to 0–100%.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    discounts::{clamped_fraction, minor_after_fraction_off, percent_points, whole_percent_saving},
    promotions::ProductOverride,
};

/// Which price the resolver used as the floor before stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorSource {
    /// A promotion's absolute override price.
    Promotional,

    /// The merchant's sale price.
    Sale,

    /// The catalog base price.
    Base,
}

/// Resolved price of a single product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingResult<'a> {
    original_price: Money<'a, Currency>,
    display_price: Money<'a, Currency>,
    has_discount: bool,
    discount_percentage: u32,
    extra_promotional_discount: Decimal,
    floor_source: FloorSource,
}

impl<'a> PricingResult<'a> {
    /// Result for a product whose base price is unusable.
    fn invalid(currency: &'a Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            original_price: zero,
            display_price: zero,
            has_discount: false,
            discount_percentage: 0,
            extra_promotional_discount: Decimal::ZERO,
            floor_source: FloorSource::Base,
        }
    }

    /// Pre-discount anchor price, shown struck through.
    pub fn original_price(&self) -> Money<'a, Currency> {
        self.original_price
    }

    /// Final price charged and shown.
    pub fn display_price(&self) -> Money<'a, Currency> {
        self.display_price
    }

    /// Whether the display price is below the original price.
    pub const fn has_discount(&self) -> bool {
        self.has_discount
    }

    /// Whole-percent discount relative to the original price.
    pub const fn discount_percentage(&self) -> u32 {
        self.discount_percentage
    }

    /// Additional promotional percentage (in percent points) that was stacked, or zero.
    pub const fn extra_promotional_discount(&self) -> Decimal {
        self.extra_promotional_discount
    }

    /// Which price the discount started from.
    pub const fn floor_source(&self) -> FloorSource {
        self.floor_source
    }

    /// Whether a promotion (rather than a plain markdown) contributed to the price.
    pub fn is_promotional(&self) -> bool {
        self.floor_source == FloorSource::Promotional
            || self.extra_promotional_discount > Decimal::ZERO
    }

    /// Amount saved against the original price.
    pub fn savings(&self) -> Money<'a, Currency> {
        Money::from_minor(
            self.original_price
                .to_minor_units()
                .saturating_sub(self.display_price.to_minor_units()),
            self.original_price.currency(),
        )
    }
}

/// Resolve the display price of a product.
///
/// Expired or otherwise inapplicable overrides must be filtered out before
/// calling; see [`select_override`](crate::promotions::select_override).
pub fn resolve_price<'a>(
    base_price: Money<'a, Currency>,
    sale_price: Option<Money<'a, Currency>>,
    promotion_override: Option<&ProductOverride<'a>>,
) -> PricingResult<'a> {
    let currency = base_price.currency();
    let base = base_price.to_minor_units();

    if base <= 0 {
        warn!(base_minor = base, "non-positive base price; resolving to zero");

        return PricingResult::invalid(currency);
    }

    let below_base = |price: Money<'a, Currency>| {
        if price.currency() != currency {
            debug!(
                price_currency = price.currency().iso_alpha_code,
                base_currency = currency.iso_alpha_code,
                "ignoring price in foreign currency"
            );

            return None;
        }

        let minor = price.to_minor_units();

        (minor < base).then_some(minor.max(0))
    };

    let promotional = promotion_override
        .and_then(ProductOverride::promotional_price)
        .and_then(below_base);
    let sale = sale_price.and_then(below_base);

    let (floor_source, floor) = match (promotional, sale) {
        (Some(promotional), _) => (FloorSource::Promotional, promotional),
        (None, Some(sale)) => (FloorSource::Sale, sale),
        (None, None) => (FloorSource::Base, base),
    };

    let stacked = promotion_override
        .map(|info| clamped_fraction(info.additional_discount()))
        .filter(|fraction| *fraction > Decimal::ZERO);

    let (display, extra_promotional_discount) = match stacked {
        Some(fraction) => match minor_after_fraction_off(floor, fraction) {
            // Nothing is reported as stacked when it did not move the price.
            Ok(display) if display < floor => (display, percent_points(fraction)),
            Ok(display) => (display, Decimal::ZERO),
            Err(err) => {
                warn!(floor_minor = floor, %err, "could not stack additional discount");

                (floor, Decimal::ZERO)
            }
        },
        None => (floor, Decimal::ZERO),
    };

    let has_discount = display < base;

    PricingResult {
        original_price: base_price,
        display_price: Money::from_minor(display, currency),
        has_discount,
        discount_percentage: if has_discount {
            whole_percent_saving(base, display)
        } else {
            0
        },
        extra_promotional_discount,
        floor_source,
    }
}
