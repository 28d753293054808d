//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Catalog product identifier, as issued by the data-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product price facts as loaded from the catalog.
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Catalog list price
    pub base_price: Money<'a, Currency>,

    /// Merchant-set permanent markdown, if any
    pub sale_price: Option<Money<'a, Currency>>,
}

impl<'a> Product<'a> {
    /// Create a product without a sale price.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        base_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            sale_price: None,
        }
    }

    /// Set the sale price.
    #[must_use]
    pub fn with_sale_price(mut self, sale_price: Money<'a, Currency>) -> Self {
        self.sale_price = Some(sale_price);
        self
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::ZAR;

    use super::*;

    #[test]
    fn product_id_displays_raw_identifier() {
        let id = ProductId::from("sku-42");

        assert_eq!(id.to_string(), "sku-42");
        assert_eq!(id.as_str(), "sku-42");
    }

    #[test]
    fn with_sale_price_sets_markdown() {
        let product = Product::new("sku-1", "Kettle", Money::from_minor(100_00, ZAR))
            .with_sale_price(Money::from_minor(80_00, ZAR));

        assert_eq!(product.sale_price, Some(Money::from_minor(80_00, ZAR)));
    }
}
