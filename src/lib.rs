//! Pricewise
//!
//! Pricewise is a pricing and promotion rule engine for storefront checkouts.
//! It resolves the single customer-facing price of each product from its base
//! price, sale price and promotional override, then checks a cart against the
//! promotions that are live right now and explains what the customer has
//! unlocked or could still unlock.

pub mod cart;
pub mod clock;
pub mod discounts;
pub mod fixtures;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod report;
pub mod utils;
