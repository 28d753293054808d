//! Integration tests for the bundled fixture sets.
//!
//! `homeware` at 2026-06-01T09:00:00Z:
//!
//! - Kettle: R100.00, sale R80.00, Winter Warmers R70.00 + 10% -> R63.00
//! - Toaster: R450.00 (Autumn Clearance has expired)
//! - Mug: 2 x R30.00
//! - Teapot: R200.00, sale R180.00
//! - Subtotal: R753.00
//!
//! Spend & Save (kettle + toaster, R513.00 of R500.00) is unlocked. Mug Monday
//! needs R100.00 of mugs, R40.00 more than the cart holds.
//!
//! `trade-counter` has a mandatory R900.00 minimum across the whole cart, so
//! a R665.00 cart cannot check out.

use jiff::Timestamp;
use rusty_money::{Money, iso::ZAR};
use testresult::TestResult;

use pricewise::{
    cart::validation::{CartValidator, PromotionFeed, ValidatorConfig, validate_cart},
    clock::FixedClock,
    fixtures::Fixture,
    pricing::FloorSource,
    products::ProductId,
    report::CartReport,
};

fn now() -> Result<Timestamp, jiff::Error> {
    "2026-06-01T09:00:00Z".parse()
}

#[test]
fn homeware_cart_prices_every_line() -> TestResult {
    let fixture = Fixture::from_set("homeware")?;
    let cart = fixture.cart(now()?)?;

    let kettle = cart
        .items()
        .iter()
        .find(|item| item.product_id() == &ProductId::from("kettle"))
        .ok_or("kettle missing")?;

    let pricing = kettle.pricing().ok_or("kettle not priced")?;

    assert_eq!(pricing.display_price(), Money::from_minor(63_00, ZAR));
    assert_eq!(pricing.discount_percentage(), 37);
    assert_eq!(pricing.floor_source(), FloorSource::Promotional);

    let toaster = cart
        .items()
        .iter()
        .find(|item| item.product_id() == &ProductId::from("toaster"))
        .ok_or("toaster missing")?;

    assert_eq!(toaster.unit_price(), Money::from_minor(450_00, ZAR));
    assert_eq!(cart.subtotal(), Money::from_minor(753_00, ZAR));

    Ok(())
}

#[test]
fn homeware_cart_validates_with_one_unlock_and_one_tip() -> TestResult {
    let fixture = Fixture::from_set("homeware")?;
    let cart = fixture.cart(now()?)?;

    let result = validate_cart(&cart, fixture.promotions(), now()?);

    assert!(result.is_valid);
    assert_eq!(
        result.messages.as_slice(),
        ["10% off unlocked with Spend & Save"]
    );
    assert_eq!(
        result.suggestions.as_slice(),
        ["Add R40.00 more of eligible items to unlock R10.00 off with Mug Monday"]
    );

    Ok(())
}

#[test]
fn autumn_clearance_applies_inside_its_window() -> TestResult {
    let fixture = Fixture::from_set("homeware")?;
    let cart = fixture.cart("2026-04-15T12:00:00Z".parse()?)?;

    let teapot = cart
        .items()
        .iter()
        .find(|item| item.product_id() == &ProductId::from("teapot"))
        .ok_or("teapot missing")?;

    assert_eq!(teapot.unit_price(), Money::from_minor(50_00, ZAR));

    Ok(())
}

#[test]
fn trade_counter_blocks_checkout_below_minimum() -> TestResult {
    let fixture = Fixture::from_set("trade-counter")?;
    let cart = fixture.cart(now()?)?;

    let result = CartValidator::new(FixedClock::new(now()?))
        .validate(&cart, PromotionFeed::Loaded(fixture.promotions()));

    assert!(!result.is_valid);
    assert!(!result.can_proceed_to_checkout);
    assert_eq!(
        result.messages.as_slice(),
        ["Trade Counter requires a minimum order of R900.00 (R665.00 in cart)"]
    );
    assert_eq!(
        result.suggestions.as_slice(),
        ["Add R235.00 more to unlock 5% off with Trade Counter"]
    );

    Ok(())
}

#[test]
fn disabled_validator_lets_trade_counter_through() -> TestResult {
    let fixture = Fixture::from_set("trade-counter")?;
    let cart = fixture.cart(now()?)?;

    let result = CartValidator::new(FixedClock::new(now()?))
        .with_config(ValidatorConfig::from_yaml("enabled: false")?)
        .validate(&cart, PromotionFeed::Loaded(fixture.promotions()));

    assert!(result.can_proceed_to_checkout);
    assert!(result.messages.is_empty());

    Ok(())
}

#[test]
fn report_renders_fixture_cart() -> TestResult {
    let fixture = Fixture::from_set("homeware")?;
    let cart = fixture.cart(now()?)?;
    let result = validate_cart(&cart, fixture.promotions(), now()?);

    let mut out = Vec::new();
    CartReport::new(&cart, &result)
        .with_product_names(fixture.products())
        .write_to(&mut out)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("Kettle"));
    assert!(output.contains("Teapot"));
    assert!(output.contains("Subtotal:  R753.00"));
    assert!(output.contains("10% off unlocked with Spend & Save"));

    Ok(())
}
