//! Integration tests for cart promotion validation.
//!
//! Promotions are an enhancement to checkout and never a dependency of it:
//! missing promotions validate clean, expired promotions are invisible, and
//! tips for unmet promotions are ordered by how close the customer is.

use jiff::{Timestamp, ToSpan};
use rusty_money::{
    Money,
    iso::{Currency, ZAR},
};
use testresult::TestResult;

use pricewise::{
    cart::{
        Cart, CartItem,
        validation::{PromotionValidationResult, generate_promotion_tips, validate_cart},
    },
    products::ProductId,
    promotions::{ProductTerms, Promotion, PromotionKind, PromotionWindow},
};

fn rand(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, ZAR)
}

fn now() -> Result<Timestamp, jiff::Error> {
    "2026-06-01T09:00:00Z".parse()
}

fn toaster_cart() -> Result<Cart<'static>, pricewise::cart::CartError> {
    Cart::with_items(
        [CartItem::new(ProductId::from("toaster"), 1, rand(450_00))],
        ZAR,
    )
}

fn spend_and_save() -> Promotion<'static> {
    Promotion::new(
        "spend-and-save",
        "Spend & Save",
        PromotionKind::PercentageOff(0.10.into()),
    )
    .with_minimum_order_value(rand(500_00))
    .with_product("toaster", ProductTerms::eligible())
}

#[test]
fn unmet_minimum_suggests_remaining_spend() -> TestResult {
    let cart = toaster_cart()?;
    let result = validate_cart(&cart, &[spend_and_save()], now()?);

    assert!(result.is_valid);
    assert!(result.can_proceed_to_checkout);
    assert!(result.messages.is_empty());
    assert_eq!(
        result.suggestions.as_slice(),
        ["Add R50.00 more of eligible items to unlock 10% off with Spend & Save"]
    );

    Ok(())
}

#[test]
fn expired_promotion_is_ignored() -> TestResult {
    let now = now()?;
    let cart = toaster_cart()?;

    let expired = spend_and_save().with_window(PromotionWindow::between(
        now.checked_sub(720.hours())?,
        now.checked_sub(1.second())?,
    ));

    assert_eq!(
        validate_cart(&cart, &[expired.clone()], now),
        validate_cart(&cart, &[], now)
    );
    assert!(generate_promotion_tips(&cart, &[expired], now).is_empty());

    Ok(())
}

#[test]
fn missing_promotions_validate_clean() -> TestResult {
    let now = now()?;
    let empty = Cart::new(ZAR);
    let cart = toaster_cart()?;

    assert_eq!(
        validate_cart(&empty, &[], now),
        PromotionValidationResult::all_clear()
    );
    assert_eq!(
        validate_cart(&cart, &[], now),
        PromotionValidationResult::all_clear()
    );

    Ok(())
}

#[test]
fn tips_are_ordered_by_ascending_gap() -> TestResult {
    let cart = Cart::with_items(
        [
            CartItem::new(ProductId::from("toaster"), 1, rand(450_00)),
            CartItem::new(ProductId::from("mug"), 2, rand(30_00)),
        ],
        ZAR,
    )?;

    let promotions = [
        Promotion::new(
            "big-spender",
            "Big Spender",
            PromotionKind::ThresholdDiscount(rand(100_00)),
        )
        .with_minimum_order_value(rand(1_000_00)),
        Promotion::new(
            "mug-monday",
            "Mug Monday",
            PromotionKind::ThresholdDiscount(rand(10_00)),
        )
        .with_minimum_order_value(rand(100_00))
        .with_product("mug", ProductTerms::eligible()),
        spend_and_save(),
    ];

    let tips = generate_promotion_tips(&cart, &promotions, now()?);
    let gaps: Vec<i64> = tips.iter().map(|tip| tip.gap.to_minor_units()).collect();

    assert_eq!(gaps, vec![40_00, 50_00, 490_00]);
    assert_eq!(tips.first().ok_or("expected tip")?.promotion_name, "Mug Monday");

    let result = validate_cart(&cart, &promotions, now()?);
    let messages: Vec<&str> = tips.iter().map(|tip| tip.message.as_str()).collect();

    assert_eq!(result.suggestions.as_slice(), messages.as_slice());

    Ok(())
}
