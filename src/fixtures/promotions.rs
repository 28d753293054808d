//! Promotion Fixtures
//!
//! Loosely-shaped promotion records as they come from storage. Converting a
//! record into a [`Promotion`] is where malformed data gets rejected, so the
//! engine itself only ever sees well-formed promotions.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    fixtures::{
        FixtureError,
        products::{parse_money, parse_percentage},
    },
    promotions::{ProductTerms, Promotion, PromotionKind, PromotionWindow},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promotion id -> promotion fixture
    pub promotions: FxHashMap<String, PromotionFixture>,
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion name
    pub name: String,

    /// Whether the promotion is switched on
    #[serde(default = "default_active")]
    pub active: bool,

    /// Whether an unmet minimum blocks checkout
    #[serde(default)]
    pub mandatory: bool,

    /// Start of the promotion, unbounded when missing
    #[serde(default)]
    pub starts_at: Option<Timestamp>,

    /// End of the promotion, unbounded when missing
    #[serde(default)]
    pub ends_at: Option<Timestamp>,

    /// Minimum order value (e.g., "500.00 ZAR")
    #[serde(default)]
    pub minimum_order_value: Option<String>,

    /// Headline discount configuration
    pub discount: DiscountFixtureConfig,

    /// Allowlisted products and their terms
    #[serde(default)]
    pub products: Vec<ProductTermsFixture>,
}

fn default_active() -> bool {
    true
}

/// Headline discount configuration from YAML fixtures
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixtureConfig {
    /// Percentage off (e.g., "10%")
    PercentageOff {
        /// Percentage string (e.g., "10%" or "0.1")
        value: String,
    },

    /// Per-product promotional prices
    FixedPriceOverride,

    /// Amount off the order once the minimum is met (e.g., "20.00 ZAR")
    ThresholdDiscount {
        /// Amount string (e.g., "20.00 ZAR")
        value: String,
    },
}

/// Per-product promotion terms from YAML fixtures
#[derive(Debug, Deserialize)]
pub struct ProductTermsFixture {
    /// Product id
    pub product: String,

    /// Absolute promotional price (e.g., "70.00 ZAR")
    #[serde(default)]
    pub promotional_price: Option<String>,

    /// Extra percentage stacked on the floor price (e.g., "10%")
    #[serde(default)]
    pub additional_discount: Option<String>,
}

impl TryFrom<DiscountFixtureConfig> for PromotionKind<'static> {
    type Error = FixtureError;

    fn try_from(config: DiscountFixtureConfig) -> Result<Self, Self::Error> {
        match config {
            DiscountFixtureConfig::PercentageOff { value } => {
                Ok(PromotionKind::PercentageOff(parse_percentage(&value)?))
            }
            DiscountFixtureConfig::FixedPriceOverride => Ok(PromotionKind::FixedPriceOverride),
            DiscountFixtureConfig::ThresholdDiscount { value } => {
                let amount = parse_money(&value)?;

                if amount.to_minor_units() <= 0 {
                    return Err(FixtureError::InvalidPrice(value));
                }

                Ok(PromotionKind::ThresholdDiscount(amount))
            }
        }
    }
}

impl TryFrom<ProductTermsFixture> for ProductTerms<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ProductTermsFixture) -> Result<Self, Self::Error> {
        let mut terms = match fixture.promotional_price.as_deref() {
            Some(price) => ProductTerms::promotional_price(parse_money(price)?),
            None => ProductTerms::eligible(),
        };

        if let Some(additional) = fixture.additional_discount.as_deref() {
            terms = terms.with_additional_discount(parse_percentage(additional)?);
        }

        Ok(terms)
    }
}

impl PromotionFixture {
    /// Convert to a [`Promotion`] with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount or percentage is invalid, amounts mix
    /// currencies, the window ends before it starts, or a fixed price override
    /// has no promotional prices.
    pub fn try_into_promotion(self, id: String) -> Result<Promotion<'static>, FixtureError> {
        let window = PromotionWindow::new(self.starts_at, self.ends_at);

        if !window.is_coherent() {
            return Err(FixtureError::InvalidPromotionData(format!(
                "{id}: ends before it starts"
            )));
        }

        let kind = PromotionKind::try_from(self.discount)?;

        let mut currencies: Vec<&'static Currency> = Vec::new();
        let mut promotion = Promotion::new(id.clone(), self.name, kind)
            .with_active(self.active)
            .with_mandatory(self.mandatory)
            .with_window(window);

        if let PromotionKind::ThresholdDiscount(amount) = kind {
            currencies.push(amount.currency());
        }

        if let Some(minimum) = self.minimum_order_value.as_deref() {
            let minimum = parse_money(minimum)?;

            if minimum.to_minor_units() < 0 {
                return Err(FixtureError::InvalidPrice(format!(
                    "{id}: negative minimum order value"
                )));
            }

            currencies.push(minimum.currency());
            promotion = promotion.with_minimum_order_value(minimum);
        }

        let mut has_promotional_price = false;

        for product in self.products {
            let product_id = product.product.clone();
            let terms = ProductTerms::try_from(product)?;

            if let Some(price) = terms.promotional_price {
                has_promotional_price = true;
                currencies.push(price.currency());
            }

            promotion = promotion.with_product(product_id, terms);
        }

        if matches!(kind, PromotionKind::FixedPriceOverride) && !has_promotional_price {
            return Err(FixtureError::InvalidPromotionData(format!(
                "{id}: fixed price override without promotional prices"
            )));
        }

        check_single_currency(&currencies)?;

        Ok(promotion)
    }
}

fn check_single_currency(currencies: &[&'static Currency]) -> Result<(), FixtureError> {
    let Some(first) = currencies.first() else {
        return Ok(());
    };

    match currencies.iter().find(|currency| **currency != *first) {
        Some(other) => Err(FixtureError::CurrencyMismatch(
            first.iso_alpha_code.to_string(),
            other.iso_alpha_code.to_string(),
        )),
        None => Ok(()),
    }
}
