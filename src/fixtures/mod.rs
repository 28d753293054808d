//! Fixtures

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    fixtures::{carts::CartFixture, products::ProductsFixture, promotions::PromotionsFixture},
    products::Product,
    promotions::Promotion,
};

pub mod carts;
pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Promotion not found
    #[error("Promotion not found: {0}")]
    PromotionNotFound(String),

    /// Invalid promotion data
    #[error("Invalid promotion data: {0}")]
    InvalidPromotionData(String),

    /// Currency mismatch between fixture records
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
///
/// A named set of products, promotions and a cart loaded from
/// `{base_path}/{products,promotions,carts}/{name}.yml`.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Product id -> product
    products: FxHashMap<String, Product<'static>>,

    /// Promotions ordered by id
    promotions: Vec<Promotion<'static>>,

    /// Cart lines as (product id, quantity)
    cart_lines: Vec<(String, u32)>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            promotions: Vec::new(),
            cart_lines: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.try_into_product(key.clone())?;
            let currency = product.base_price.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load promotions from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a promotion is
    /// malformed, or if it is priced in another currency than the products.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for (key, promotion_fixture) in fixture.promotions {
            let promotion = promotion_fixture.try_into_promotion(key.clone())?;

            if let Some(currency) = self.currency
                && !promotion.is_well_formed_for(currency)
            {
                return Err(FixtureError::InvalidPromotionData(format!(
                    "{key}: not priced in {}",
                    currency.iso_alpha_code
                )));
            }

            self.promotions.push(promotion);
        }

        self.promotions.sort_by(|a, b| a.id().cmp(b.id()));

        Ok(self)
    }

    /// Load a cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a line
    /// references a product that has not been loaded.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for line in fixture.items {
            if !self.products.contains_key(&line.product) {
                return Err(FixtureError::ProductNotFound(line.product));
            }

            self.cart_lines.push((line.product, line.quantity));
        }

        Ok(self)
    }

    /// Load a complete fixture set (products, promotions and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(name)?
            .load_promotions(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'static>, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get all loaded products
    pub fn products(&self) -> impl Iterator<Item = &Product<'static>> {
        self.products.values()
    }

    /// Get a promotion by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion is not found.
    pub fn promotion(&self, key: &str) -> Result<&Promotion<'static>, FixtureError> {
        self.promotions
            .iter()
            .find(|promotion| promotion.id().as_str() == key)
            .ok_or_else(|| FixtureError::PromotionNotFound(key.to_string()))
    }

    /// Get all promotions, ordered by id
    pub fn promotions(&self) -> &[Promotion<'static>] {
        &self.promotions
    }

    /// Get the cart lines as (product id, quantity)
    pub fn cart_lines(&self) -> &[(String, u32)] {
        &self.cart_lines
    }

    /// Price the loaded cart lines against the loaded promotions at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded, a line references an
    /// unknown product, or cart creation fails.
    pub fn cart(&self, now: Timestamp) -> Result<Cart<'static>, FixtureError> {
        let currency = self.currency()?;

        let lines = self
            .cart_lines
            .iter()
            .map(|(key, quantity)| Ok((self.product(key)?.clone(), *quantity)))
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(Cart::price_products(&lines, &self.promotions, now, currency)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
