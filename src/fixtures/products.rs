//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD, ZAR},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Catalog base price (e.g., "100.00 ZAR")
    pub price: String,

    /// Optional sale price (e.g., "80.00 ZAR")
    #[serde(default)]
    pub sale_price: Option<String>,
}

impl ProductFixture {
    /// Convert to a [`Product`] with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or the sale price is in
    /// another currency than the base price.
    pub fn try_into_product(self, id: String) -> Result<Product<'static>, FixtureError> {
        let base_price = parse_money(&self.price)?;

        let mut product = Product::new(id, self.name, base_price);

        if let Some(sale_price) = self.sale_price.as_deref() {
            let sale_price = parse_money(sale_price)?;

            if sale_price.currency() != base_price.currency() {
                return Err(FixtureError::CurrencyMismatch(
                    base_price.currency().iso_alpha_code.to_string(),
                    sale_price.currency().iso_alpha_code.to_string(),
                ));
            }

            product = product.with_sale_price(sale_price);
        }

        Ok(product)
    }
}

/// Parse a price string straight into [`Money`].
///
/// # Errors
///
/// See [`parse_price`].
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "2.99 ZAR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "ZAR" => ZAR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// Values outside 0–100% are rejected.
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or if the value is out of range.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();
    let invalid = |_err| FixtureError::InvalidPercentage(s.to_string());

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str.trim().parse::<Decimal>().map_err(invalid)? / Decimal::ONE_HUNDRED
    } else {
        trimmed.parse::<Decimal>().map_err(invalid)?
    };

    if !(Decimal::ZERO..=Decimal::ONE).contains(&value) {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::discounts::fraction;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99ZAR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_reads_rand() -> TestResult {
        assert_eq!(parse_price("450.50 ZAR")?, (450_50, ZAR));

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(fraction(&parse_percentage("15%")?), Decimal::new(15, 2));
        assert_eq!(fraction(&parse_percentage("0.15")?), Decimal::new(15, 2));
        assert_eq!(fraction(&parse_percentage("7%")?), Decimal::new(7, 2));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_out_of_range() {
        assert!(matches!(
            parse_percentage("150%"),
            Err(FixtureError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("-0.1"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn product_fixture_with_sale_price() -> TestResult {
        let fixture = ProductFixture {
            name: "Kettle".to_string(),
            price: "100.00 ZAR".to_string(),
            sale_price: Some("80.00 ZAR".to_string()),
        };

        let product = fixture.try_into_product("kettle".to_string())?;

        assert_eq!(product.base_price, Money::from_minor(100_00, ZAR));
        assert_eq!(product.sale_price, Some(Money::from_minor(80_00, ZAR)));

        Ok(())
    }

    #[test]
    fn product_fixture_rejects_mixed_currencies() {
        let fixture = ProductFixture {
            name: "Kettle".to_string(),
            price: "100.00 ZAR".to_string(),
            sale_price: Some("80.00 GBP".to_string()),
        };

        assert!(matches!(
            fixture.try_into_product("kettle".to_string()),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));
    }
}
