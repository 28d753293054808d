//! Cart promotion validation
//!
//! Checks a cart against the promotions that are live right now and explains
//! the outcome: which promotions are unlocked, which ones the customer is
//! close to, and whether anything blocks checkout.
//!
//! Promotions are an enhancement to checkout, never a dependency of it. An
//! empty, disabled or still-loading promotion feed always validates clean, and
//! malformed promotions are skipped rather than reported.

use std::cmp::Ordering;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use tracing::{Span, debug, field};

use crate::{
    cart::Cart,
    clock::{Clock, SystemClock},
    promotions::{Promotion, PromotionId},
};

/// Outcome of validating a cart against the active promotions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionValidationResult {
    /// Whether no hard constraint is violated.
    pub is_valid: bool,

    /// Whether the cart may proceed to payment.
    pub can_proceed_to_checkout: bool,

    /// Validation outcomes, blocking messages first.
    pub messages: SmallVec<[String; 4]>,

    /// Upsell nudges, closest to unlocking first.
    pub suggestions: SmallVec<[String; 4]>,
}

impl PromotionValidationResult {
    /// A valid cart with nothing to report.
    pub fn all_clear() -> Self {
        Self {
            is_valid: true,
            can_proceed_to_checkout: true,
            messages: SmallVec::new(),
            suggestions: SmallVec::new(),
        }
    }
}

impl Default for PromotionValidationResult {
    fn default() -> Self {
        Self::all_clear()
    }
}

/// An unmet promotion the customer could still unlock.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionTip<'a> {
    /// Promotion identifier
    pub promotion_id: PromotionId,

    /// Promotion name
    pub promotion_name: String,

    /// Remaining spend on eligible items needed to reach the minimum
    pub gap: Money<'a, Currency>,

    /// Customer-facing suggestion
    pub message: String,
}

/// State of the caller's promotion feed.
#[derive(Debug, Clone, Copy)]
pub enum PromotionFeed<'p, 'a> {
    /// Promotions are switched off for this caller.
    Disabled,

    /// Promotions have not been fetched yet.
    Loading,

    /// Promotions are available.
    Loaded(&'p [Promotion<'a>]),
}

/// Validator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Whether promotions are evaluated at all.
    pub enabled: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ValidatorConfig {
    /// Parse a configuration from YAML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_norway::Error> {
        serde_norway::from_str(yaml)
    }
}

/// Cart validator bound to a clock and configuration.
#[derive(Debug, Clone, Default)]
pub struct CartValidator<C: Clock = SystemClock> {
    clock: C,
    config: ValidatorConfig,
}

impl<C: Clock> CartValidator<C> {
    /// Create a validator reading time from `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            config: ValidatorConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the cart against the feed at the clock's current time.
    pub fn validate(
        &self,
        cart: &Cart<'_>,
        feed: PromotionFeed<'_, '_>,
    ) -> PromotionValidationResult {
        if !self.config.enabled {
            return PromotionValidationResult::all_clear();
        }

        validate_feed(cart, feed, self.clock.now())
    }

    /// Tips for unmet promotions at the clock's current time.
    pub fn tips<'a>(
        &self,
        cart: &Cart<'a>,
        promotions: &[Promotion<'_>],
    ) -> Vec<PromotionTip<'a>> {
        if !self.config.enabled {
            return Vec::new();
        }

        generate_promotion_tips(cart, promotions, self.clock.now())
    }
}

/// Validate a cart against a promotion feed that may not be ready.
pub fn validate_feed(
    cart: &Cart<'_>,
    feed: PromotionFeed<'_, '_>,
    now: Timestamp,
) -> PromotionValidationResult {
    match feed {
        PromotionFeed::Disabled | PromotionFeed::Loading => {
            debug!(?feed, "promotion feed unavailable; skipping validation");

            PromotionValidationResult::all_clear()
        }
        PromotionFeed::Loaded(promotions) => validate_cart(cart, promotions, now),
    }
}

/// Validate a cart against the active promotions at `now`.
#[tracing::instrument(
    name = "promotions.validate_cart",
    skip_all,
    fields(
        items = cart.len(),
        promotions = promotions.len(),
        live = field::Empty,
        is_valid = field::Empty
    )
)]
pub fn validate_cart(
    cart: &Cart<'_>,
    promotions: &[Promotion<'_>],
    now: Timestamp,
) -> PromotionValidationResult {
    if promotions.is_empty() {
        return PromotionValidationResult::all_clear();
    }

    let mut evaluations = evaluate(cart, promotions, now);

    Span::current().record("live", evaluations.len());

    let mut blocking = SmallVec::<[String; 4]>::new();
    let mut advisory = SmallVec::<[String; 4]>::new();

    for evaluation in &evaluations {
        let promotion = evaluation.promotion;

        match (evaluation.minimum, evaluation.gap) {
            (Some(minimum), Some(_)) if promotion.is_mandatory() => {
                blocking.push(format!(
                    "{} requires a minimum order of {} ({} in cart)",
                    promotion.name(),
                    minimum,
                    evaluation.eligible_total,
                ));
            }
            (Some(_), None) => {
                advisory.push(format!(
                    "{} unlocked with {}",
                    promotion.kind().headline(),
                    promotion.name()
                ));
            }
            _ => {}
        }
    }

    evaluations.retain(|evaluation| evaluation.gap.is_some());
    evaluations.sort_by(by_gap);

    let suggestions = evaluations
        .iter()
        .filter_map(|evaluation| Some(evaluation.suggestion(evaluation.gap?)))
        .collect();

    let is_valid = blocking.is_empty();

    Span::current().record("is_valid", is_valid);

    let mut messages = blocking;
    messages.extend(advisory);

    PromotionValidationResult {
        is_valid,
        can_proceed_to_checkout: is_valid,
        messages,
        suggestions,
    }
}

/// Live promotions whose allowlist intersects the cart, met or not.
///
/// Unrestricted promotions intersect any non-empty cart.
pub fn applicable_promotions<'p, 'a>(
    cart: &Cart<'_>,
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
) -> Vec<&'p Promotion<'a>> {
    live_promotions(cart, promotions, now)
        .filter(|promotion| intersects(cart, promotion))
        .collect()
}

/// One tip per unmet promotion that applies to the cart, closest to unlocking first.
#[tracing::instrument(
    name = "promotions.generate_tips",
    skip_all,
    fields(items = cart.len(), promotions = promotions.len())
)]
pub fn generate_promotion_tips<'a>(
    cart: &Cart<'a>,
    promotions: &[Promotion<'_>],
    now: Timestamp,
) -> Vec<PromotionTip<'a>> {
    let mut evaluations: Vec<_> = evaluate(cart, promotions, now)
        .into_iter()
        .filter(|evaluation| evaluation.gap.is_some() && intersects(cart, evaluation.promotion))
        .collect();

    evaluations.sort_by(by_gap);

    evaluations
        .iter()
        .filter_map(|evaluation| {
            let gap = evaluation.gap?;

            Some(PromotionTip {
                promotion_id: evaluation.promotion.id().clone(),
                promotion_name: evaluation.promotion.name().to_string(),
                gap,
                message: evaluation.suggestion(gap),
            })
        })
        .collect()
}

/// A live promotion measured against a cart.
#[derive(Debug)]
struct Evaluation<'p, 'a> {
    promotion: &'p Promotion<'a>,
    eligible_total: Money<'static, Currency>,
    minimum: Option<Money<'static, Currency>>,
    gap: Option<Money<'static, Currency>>,
}

impl Evaluation<'_, '_> {
    fn suggestion(&self, gap: Money<'_, Currency>) -> String {
        let scope = if self.promotion.is_restricted() {
            " of eligible items"
        } else {
            ""
        };

        format!(
            "Add {gap} more{scope} to unlock {} with {}",
            self.promotion.kind().headline(),
            self.promotion.name()
        )
    }

    fn gap_minor(&self) -> i64 {
        self.gap.map_or(0, |gap| gap.to_minor_units())
    }
}

fn evaluate<'p, 'a>(
    cart: &Cart<'_>,
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
) -> Vec<Evaluation<'p, 'a>> {
    let currency = cart.currency();

    live_promotions(cart, promotions, now)
        .map(|promotion| {
            let eligible_minor = cart.eligible_total(promotion).to_minor_units();
            let minimum_minor = promotion
                .minimum_order_value()
                .map(Money::to_minor_units);

            let gap = minimum_minor
                .map(|minimum| minimum.saturating_sub(eligible_minor))
                .filter(|gap| *gap > 0)
                .map(|gap| Money::from_minor(gap, currency));

            Evaluation {
                promotion,
                eligible_total: Money::from_minor(eligible_minor, currency),
                minimum: minimum_minor.map(|minimum| Money::from_minor(minimum, currency)),
                gap,
            }
        })
        .collect()
}

fn live_promotions<'p, 'a>(
    cart: &Cart<'_>,
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
) -> impl Iterator<Item = &'p Promotion<'a>> {
    let currency = cart.currency();

    promotions.iter().filter(move |promotion| {
        if !promotion.is_live_at(now) {
            return false;
        }

        if !promotion.is_well_formed_for(currency) {
            debug!(
                promotion_id = %promotion.id(),
                promotion_type = promotion.kind().as_str(),
                cart_currency = currency.iso_alpha_code,
                "skipping malformed promotion"
            );

            return false;
        }

        true
    })
}

fn intersects(cart: &Cart<'_>, promotion: &Promotion<'_>) -> bool {
    if promotion.is_restricted() {
        cart.items()
            .iter()
            .any(|item| promotion.covers(item.product_id()))
    } else {
        !cart.is_empty()
    }
}

fn by_gap(left: &Evaluation<'_, '_>, right: &Evaluation<'_, '_>) -> Ordering {
    left.gap_minor()
        .cmp(&right.gap_minor())
        .then_with(|| left.promotion.name().cmp(right.promotion.name()))
        .then_with(|| left.promotion.id().cmp(right.promotion.id()))
}
