//! Pricewise prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartError, CartItem, price_item,
        validation::{
            CartValidator, PromotionFeed, PromotionTip, PromotionValidationResult,
            ValidatorConfig, applicable_promotions, generate_promotion_tips, validate_cart,
            validate_feed,
        },
    },
    clock::{Clock, FixedClock, SystemClock},
    discounts::DiscountError,
    fixtures::{Fixture, FixtureError},
    pricing::{FloorSource, PricingResult, resolve_price},
    products::{Product, ProductId},
    promotions::{
        ProductOverride, ProductTerms, Promotion, PromotionId, PromotionKind, PromotionWindow,
        select_override,
    },
    report::{CartReport, ReportError},
};
