//! Cart
//!
//! A single-currency snapshot of a customer's cart. Line items carry unit
//! prices that were already resolved by [`resolve_price`]; the validator
//! only ever reads the cart.

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    money::saturating_sum_minor,
    pricing::{PricingResult, resolve_price},
    products::{Product, ProductId},
    promotions::{Promotion, select_override},
};

pub mod validation;

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// Cart line item with its already-resolved unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    product_id: ProductId,
    quantity: u32,
    unit_price: Money<'a, Currency>,
    pricing: Option<PricingResult<'a>>,
}

impl<'a> CartItem<'a> {
    /// Create a line item from a unit price.
    pub fn new(
        product_id: impl Into<ProductId>,
        quantity: u32,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price,
            pricing: None,
        }
    }

    /// Create a line item priced by the resolver, keeping the result for badges.
    pub fn from_pricing(
        product_id: impl Into<ProductId>,
        quantity: u32,
        pricing: PricingResult<'a>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price: pricing.display_price(),
            pricing: Some(pricing),
        }
    }

    /// Product on this line.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Number of units.
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Resolved unit price.
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Pricing details, when the line was priced by the resolver.
    pub fn pricing(&self) -> Option<&PricingResult<'a>> {
        self.pricing.as_ref()
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money<'a, Currency> {
        Money::from_minor(self.line_total_minor(), self.unit_price.currency())
    }

    fn line_total_minor(&self) -> i64 {
        self.unit_price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Price a catalog product into a cart line.
///
/// The override is chosen from `promotions` at `now` (see [`select_override`]),
/// then the product is resolved once and its display price becomes the unit price.
pub fn price_item<'a>(
    product: &Product<'a>,
    quantity: u32,
    promotions: &[Promotion<'a>],
    now: Timestamp,
) -> CartItem<'a> {
    let info = select_override(product, promotions, now);
    let pricing = resolve_price(product.base_price, product.sale_price, info.as_ref());

    CartItem::from_pricing(product.id.clone(), quantity, pricing)
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given items.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if an item is priced in another currency.
    pub fn with_items(
        items: impl Into<Vec<CartItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.unit_price().currency();
            if item_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Cart { items, currency })
    }

    /// Price catalog products into a cart.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a product is priced in another currency.
    pub fn price_products(
        lines: &[(Product<'a>, u32)],
        promotions: &[Promotion<'a>],
        now: Timestamp,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items: Vec<CartItem<'a>> = lines
            .iter()
            .map(|(product, quantity)| price_item(product, *quantity, promotions, now))
            .collect();

        Self::with_items(items, currency)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        Money::from_minor(
            saturating_sum_minor(self.items.iter().map(CartItem::line_total_minor)),
            self.currency,
        )
    }

    /// Sum of line totals that count towards the promotion.
    ///
    /// Unrestricted promotions count the whole cart.
    pub fn eligible_total(&self, promotion: &Promotion<'_>) -> Money<'a, Currency> {
        Money::from_minor(
            saturating_sum_minor(
                self.items
                    .iter()
                    .filter(|item| promotion.covers(item.product_id()))
                    .map(CartItem::line_total_minor),
            ),
            self.currency,
        )
    }

    /// Distinct products in the cart.
    pub fn product_ids(&self) -> FxHashSet<&ProductId> {
        self.items.iter().map(CartItem::product_id).collect()
    }

    /// Get the number of line items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
