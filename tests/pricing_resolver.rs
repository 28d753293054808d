//! Integration tests for the pricing resolver.
//!
//! Covers the worked pricing examples and the properties every resolved price
//! must satisfy, whatever the inputs:
//!
//! - the display price never exceeds the original price;
//! - the display price is never negative, even for nonsensical inputs;
//! - a promotional price beats a sale price when both are below the base price;
//! - resolving the same inputs twice gives the same result.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::ZAR};
use testresult::TestResult;

use pricewise::{
    pricing::{FloorSource, resolve_price},
    products::ProductId,
    promotions::ProductOverride,
};

fn rand(minor: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_minor(minor, ZAR)
}

fn promo(price: Option<i64>, additional: f64) -> ProductOverride<'static> {
    ProductOverride::new(
        ProductId::from("kettle"),
        "Winter Warmers".to_string(),
        price.map(rand),
        Percentage::from(additional),
        None,
    )
}

#[test]
fn base_price_only_has_no_discount() {
    let result = resolve_price(rand(100_00), None, None);

    assert_eq!(result.original_price(), rand(100_00));
    assert_eq!(result.display_price(), rand(100_00));
    assert!(!result.has_discount());
    assert_eq!(result.discount_percentage(), 0);
    assert_eq!(result.extra_promotional_discount(), Decimal::ZERO);
}

#[test]
fn sale_price_is_shown_against_base_price() {
    let result = resolve_price(rand(100_00), Some(rand(80_00)), None);

    assert_eq!(result.display_price(), rand(80_00));
    assert!(result.has_discount());
    assert_eq!(result.discount_percentage(), 20);
    assert_eq!(result.floor_source(), FloorSource::Sale);
}

#[test]
fn additional_discount_stacks_on_promotional_price() {
    let info = promo(Some(70_00), 0.10);
    let result = resolve_price(rand(100_00), Some(rand(80_00)), Some(&info));

    assert_eq!(result.original_price(), rand(100_00));
    assert_eq!(result.display_price(), rand(63_00));
    assert_eq!(result.discount_percentage(), 37);
    assert_eq!(result.extra_promotional_discount(), Decimal::from(10));
    assert_eq!(result.floor_source(), FloorSource::Promotional);
}

#[test]
fn additional_discount_stacks_on_base_price_without_other_prices() {
    let info = promo(None, 0.15);
    let result = resolve_price(rand(100_00), None, Some(&info));

    assert_eq!(result.display_price(), rand(85_00));
    assert_eq!(result.discount_percentage(), 15);
    assert_eq!(result.extra_promotional_discount(), Decimal::from(15));
    assert_eq!(result.floor_source(), FloorSource::Base);
}

#[test]
fn display_price_is_bounded_for_every_combination() -> TestResult {
    let bases = [-500, 0, 1, 99, 100_00, 1_234_56];
    let sales = [None, Some(-1), Some(0), Some(50), Some(80_00), Some(2_000_00)];
    let promotional = [None, Some(-10), Some(0), Some(70_00), Some(5_000_00)];
    let additional = [-0.5, 0.0, 0.10, 0.999, 1.0, 2.5];

    for base in bases {
        for sale in sales {
            for price in promotional {
                for pct in additional {
                    let info = promo(price, pct);
                    let result = resolve_price(rand(base), sale.map(rand), Some(&info));

                    let display = result.display_price().to_minor_units();
                    let original = result.original_price().to_minor_units();

                    assert!(display >= 0, "negative price for {base} {sale:?} {price:?} {pct}");
                    assert!(
                        display <= original,
                        "display above original for {base} {sale:?} {price:?} {pct}"
                    );
                    assert!(result.discount_percentage() <= 100);
                    assert_eq!(result.has_discount(), display < original);
                }
            }
        }
    }

    Ok(())
}

#[test]
fn promotional_price_wins_over_sale_price() {
    for (promotional, sale) in [(70_00, 80_00), (80_00, 70_00), (75_00, 75_00)] {
        let info = promo(Some(promotional), 0.0);
        let result = resolve_price(rand(100_00), Some(rand(sale)), Some(&info));

        assert_eq!(result.display_price(), rand(promotional));
        assert_eq!(result.floor_source(), FloorSource::Promotional);
    }
}

#[test]
fn resolving_twice_gives_identical_results() {
    let info = promo(Some(70_00), 0.10);

    let first = resolve_price(rand(100_00), Some(rand(80_00)), Some(&info));
    let second = resolve_price(rand(100_00), Some(rand(80_00)), Some(&info));

    assert_eq!(first, second);
}
