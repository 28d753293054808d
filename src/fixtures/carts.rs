//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for a cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines in checkout order
    pub items: Vec<CartLineFixture>,
}

/// A single cart line
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product id
    pub product: String,

    /// Number of units, defaults to one
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
