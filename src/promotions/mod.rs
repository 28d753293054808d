//! Promotions
//!
//! Promotions arrive from the data-access layer already validated into a
//! closed set of kinds (see [`PromotionKind`]). The engine only reads them:
//! eligibility, activity windows and per-product terms are all plain queries.

use std::fmt;

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{clamped_fraction, percent_points},
    products::ProductId,
};

pub mod overrides;

pub use overrides::{ProductOverride, select_override};

/// Promotion identifier, as issued by the data-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromotionId(String);

impl PromotionId {
    /// Create a promotion identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PromotionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PromotionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Headline discount of a promotion.
#[derive(Debug, Clone, Copy)]
pub enum PromotionKind<'a> {
    /// Percentage off eligible items (e.g., "10% off")
    PercentageOff(Percentage),

    /// Per-product promotional prices replace the shelf price.
    FixedPriceOverride,

    /// Fixed amount off the order once the threshold is reached (e.g., "R20.00 off")
    ThresholdDiscount(Money<'a, Currency>),
}

impl PromotionKind<'_> {
    /// Short customer-facing description of the headline discount.
    pub fn headline(&self) -> String {
        match self {
            PromotionKind::PercentageOff(percent) => {
                format!("{}% off", percent_points(clamped_fraction(percent)).round_dp(2))
            }
            PromotionKind::FixedPriceOverride => "promotional prices".to_string(),
            PromotionKind::ThresholdDiscount(amount) => format!("{amount} off"),
        }
    }

    /// Stable name of the kind, used in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PromotionKind::PercentageOff(_) => "percentage_off",
            PromotionKind::FixedPriceOverride => "fixed_price_override",
            PromotionKind::ThresholdDiscount(_) => "threshold_discount",
        }
    }
}

/// Period during which a promotion runs. Both bounds are inclusive; a missing
/// bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionWindow {
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
}

impl PromotionWindow {
    /// A window that is always open.
    pub const fn unbounded() -> Self {
        Self {
            starts_at: None,
            ends_at: None,
        }
    }

    /// Create a window from optional bounds.
    pub const fn new(starts_at: Option<Timestamp>, ends_at: Option<Timestamp>) -> Self {
        Self { starts_at, ends_at }
    }

    /// Create a window with both bounds set.
    pub const fn between(starts_at: Timestamp, ends_at: Timestamp) -> Self {
        Self {
            starts_at: Some(starts_at),
            ends_at: Some(ends_at),
        }
    }

    /// Start of the window.
    pub const fn starts_at(&self) -> Option<Timestamp> {
        self.starts_at
    }

    /// End of the window.
    pub const fn ends_at(&self) -> Option<Timestamp> {
        self.ends_at
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: Timestamp) -> bool {
        self.starts_at.is_none_or(|start| now >= start)
            && self.ends_at.is_none_or(|end| now <= end)
    }

    /// Whether the window can ever be open.
    pub fn is_coherent(&self) -> bool {
        match (self.starts_at, self.ends_at) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

/// Per-product terms of a promotion.
///
/// A product listed with default terms is simply eligible: it counts towards
/// the minimum order value but keeps its shelf price.
#[derive(Debug, Clone, Copy)]
pub struct ProductTerms<'a> {
    /// Absolute override price for the product under this promotion.
    pub promotional_price: Option<Money<'a, Currency>>,

    /// Extra percentage stacked on whichever price is otherwise in effect.
    pub additional_discount: Percentage,
}

impl<'a> ProductTerms<'a> {
    /// Eligible product with no price override.
    pub fn eligible() -> Self {
        Self {
            promotional_price: None,
            additional_discount: Percentage::from(0.0),
        }
    }

    /// Eligible product with a promotional price.
    pub fn promotional_price(price: Money<'a, Currency>) -> Self {
        Self {
            promotional_price: Some(price),
            ..Self::eligible()
        }
    }

    /// Stack an additional percentage discount.
    #[must_use]
    pub fn with_additional_discount(mut self, additional_discount: Percentage) -> Self {
        self.additional_discount = additional_discount;
        self
    }
}

/// A promotion as seen by the pricing engine.
#[derive(Debug, Clone)]
pub struct Promotion<'a> {
    id: PromotionId,
    name: String,
    active: bool,
    mandatory: bool,
    window: PromotionWindow,
    kind: PromotionKind<'a>,
    minimum_order_value: Option<Money<'a, Currency>>,
    products: FxHashMap<ProductId, ProductTerms<'a>>,
}

impl<'a> Promotion<'a> {
    /// Create an active, always-open promotion with no minimum and no product restriction.
    pub fn new(
        id: impl Into<PromotionId>,
        name: impl Into<String>,
        kind: PromotionKind<'a>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            mandatory: false,
            window: PromotionWindow::unbounded(),
            kind,
            minimum_order_value: None,
            products: FxHashMap::default(),
        }
    }

    /// Set the activity window.
    #[must_use]
    pub fn with_window(mut self, window: PromotionWindow) -> Self {
        self.window = window;
        self
    }

    /// Set the minimum order value.
    #[must_use]
    pub fn with_minimum_order_value(mut self, minimum: Money<'a, Currency>) -> Self {
        self.minimum_order_value = Some(minimum);
        self
    }

    /// Add a product to the allowlist.
    #[must_use]
    pub fn with_product(
        mut self,
        product_id: impl Into<ProductId>,
        terms: ProductTerms<'a>,
    ) -> Self {
        self.products.insert(product_id.into(), terms);
        self
    }

    /// Set whether the promotion is switched on.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set whether an unmet minimum blocks checkout.
    #[must_use]
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Return the promotion identifier.
    pub fn id(&self) -> &PromotionId {
        &self.id
    }

    /// Return the promotion name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the headline discount.
    pub const fn kind(&self) -> &PromotionKind<'a> {
        &self.kind
    }

    /// Return the activity window.
    pub const fn window(&self) -> &PromotionWindow {
        &self.window
    }

    /// Whether the promotion is switched on.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether an unmet minimum blocks checkout.
    pub const fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Minimum order value, if one is set and positive.
    pub fn minimum_order_value(&self) -> Option<&Money<'a, Currency>> {
        self.minimum_order_value
            .as_ref()
            .filter(|minimum| minimum.to_minor_units() > 0)
    }

    /// Whether the promotion runs at `now`.
    pub fn is_live_at(&self, now: Timestamp) -> bool {
        self.active && self.window.contains(now)
    }

    /// Whether the promotion limits eligibility to an allowlist of products.
    pub fn is_restricted(&self) -> bool {
        !self.products.is_empty()
    }

    /// Whether the product counts towards this promotion.
    pub fn covers(&self, product_id: &ProductId) -> bool {
        !self.is_restricted() || self.products.contains_key(product_id)
    }

    /// Allowlisted products and their terms.
    pub fn products(&self) -> impl Iterator<Item = (&ProductId, &ProductTerms<'a>)> {
        self.products.iter()
    }

    /// Per-product override for the product, if it is allowlisted.
    pub fn product_override(&self, product_id: &ProductId) -> Option<ProductOverride<'a>> {
        self.products.get(product_id).map(|terms| {
            ProductOverride::new(
                product_id.clone(),
                self.name.clone(),
                terms.promotional_price,
                terms.additional_discount,
                self.window.ends_at(),
            )
        })
    }

    /// Whether every amount on the promotion is in `currency` and its window is coherent.
    pub fn is_well_formed_for(&self, currency: &Currency) -> bool {
        let minimum_ok = self
            .minimum_order_value
            .is_none_or(|minimum| minimum.currency() == currency);

        let kind_ok = match self.kind {
            PromotionKind::ThresholdDiscount(amount) => amount.currency() == currency,
            PromotionKind::PercentageOff(_) | PromotionKind::FixedPriceOverride => true,
        };

        let products_ok = self.products.values().all(|terms| {
            terms
                .promotional_price
                .is_none_or(|price| price.currency() == currency)
        });

        minimum_ok && kind_ok && products_ok && self.window.is_coherent()
    }
}
