//! Per-product promotion overrides
//!
//! At most one promotion may override a product's price at a time. When the
//! catalog holds several live promotions for the same product,
//! [`select_override`] picks the single one the customer benefits from most.

use std::cmp::Ordering;

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    pricing::resolve_price,
    products::{Product, ProductId},
    promotions::Promotion,
};

/// Promotion terms for a single product, as handed to the price resolver.
#[derive(Debug, Clone)]
pub struct ProductOverride<'a> {
    product_id: ProductId,
    promotion_name: String,
    promotional_price: Option<Money<'a, Currency>>,
    additional_discount: Percentage,
    promotion_end_date: Option<Timestamp>,
}

impl<'a> ProductOverride<'a> {
    /// Create a product override.
    pub fn new(
        product_id: ProductId,
        promotion_name: String,
        promotional_price: Option<Money<'a, Currency>>,
        additional_discount: Percentage,
        promotion_end_date: Option<Timestamp>,
    ) -> Self {
        Self {
            product_id,
            promotion_name,
            promotional_price,
            additional_discount,
            promotion_end_date,
        }
    }

    /// Product the override applies to.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Name of the promotion granting the override.
    pub fn promotion_name(&self) -> &str {
        &self.promotion_name
    }

    /// Absolute override price.
    pub fn promotional_price(&self) -> Option<Money<'a, Currency>> {
        self.promotional_price
    }

    /// Extra percentage stacked on the floor price.
    pub fn additional_discount(&self) -> &Percentage {
        &self.additional_discount
    }

    /// When the granting promotion ends.
    pub fn promotion_end_date(&self) -> Option<Timestamp> {
        self.promotion_end_date
    }
}

/// Pick the override that applies to `product` at `now`.
///
/// Only promotions that are live at `now` and allowlist the product are
/// considered. The lowest resolved display price wins; ties go to the
/// promotion ending first, then to name and identifier so the choice is stable.
pub fn select_override<'a>(
    product: &Product<'a>,
    promotions: &[Promotion<'a>],
    now: Timestamp,
) -> Option<ProductOverride<'a>> {
    let mut candidates = promotions
        .iter()
        .filter(|promotion| promotion.is_live_at(now))
        .filter_map(|promotion| {
            let info = promotion.product_override(&product.id)?;
            let resolved = resolve_price(product.base_price, product.sale_price, Some(&info));

            Some((promotion, info, resolved.display_price().to_minor_units()))
        })
        .collect::<Vec<_>>();

    if candidates.len() > 1 {
        debug!(
            product_id = %product.id,
            candidates = candidates.len(),
            "multiple live promotions override product; picking best price"
        );
    }

    candidates.sort_by(|(left, _, left_price), (right, _, right_price)| {
        left_price
            .cmp(right_price)
            .then_with(|| ends_first(left.window().ends_at(), right.window().ends_at()))
            .then_with(|| left.name().cmp(right.name()))
            .then_with(|| left.id().cmp(right.id()))
    });

    candidates.into_iter().next().map(|(_, info, _)| info)
}

/// Order end dates so that earlier ends sort first and open-ended promotions last.
fn ends_first(left: Option<Timestamp>, right: Option<Timestamp>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso::ZAR;
    use testresult::TestResult;

    use crate::promotions::{ProductTerms, PromotionKind, PromotionWindow};

    use super::*;

    fn kettle<'a>() -> Product<'a> {
        Product::new("kettle", "Kettle", Money::from_minor(100_00, ZAR))
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-06-01T09:00:00Z".parse()
    }

    fn priced(id: &str, name: &str, price_minor: i64) -> Promotion<'static> {
        Promotion::new(id, name, PromotionKind::FixedPriceOverride).with_product(
            "kettle",
            ProductTerms::promotional_price(Money::from_minor(price_minor, ZAR)),
        )
    }

    #[test]
    fn picks_lowest_display_price() -> TestResult {
        let promotions = [priced("a", "Good", 90_00), priced("b", "Better", 75_00)];

        let info = select_override(&kettle(), &promotions, now()?).ok_or("expected override")?;

        assert_eq!(info.promotion_name(), "Better");

        Ok(())
    }

    #[test]
    fn ignores_promotions_outside_their_window() -> TestResult {
        let expired = priced("a", "Expired", 50_00).with_window(PromotionWindow::new(
            None,
            Some(now()?.checked_sub(1.hour())?),
        ));

        assert!(select_override(&kettle(), &[expired], now()?).is_none());

        Ok(())
    }

    #[test]
    fn ignores_promotions_without_the_product() -> TestResult {
        let other = Promotion::new("a", "Toasters", PromotionKind::FixedPriceOverride)
            .with_product("toaster", ProductTerms::eligible());

        assert!(select_override(&kettle(), &[other], now()?).is_none());

        Ok(())
    }

    #[test]
    fn equal_prices_prefer_the_promotion_ending_first() -> TestResult {
        let later = priced("a", "Later", 80_00)
            .with_window(PromotionWindow::new(None, Some(now()?.checked_add(48.hours())?)));
        let sooner = priced("b", "Sooner", 80_00)
            .with_window(PromotionWindow::new(None, Some(now()?.checked_add(2.hours())?)));
        let open = priced("c", "Open", 80_00);

        let info = select_override(&kettle(), &[open, later, sooner], now()?)
            .ok_or("expected override")?;

        assert_eq!(info.promotion_name(), "Sooner");

        Ok(())
    }

    #[test]
    fn full_tie_falls_back_to_name() -> TestResult {
        let promotions = [priced("z", "Bravo", 80_00), priced("y", "Alpha", 80_00)];

        let info = select_override(&kettle(), &promotions, now()?).ok_or("expected override")?;

        assert_eq!(info.promotion_name(), "Alpha");

        Ok(())
    }
}
