//! Utils

use clap::Parser;
use jiff::Timestamp;

/// Arguments for the cart example
#[derive(Debug, Parser)]
pub struct ExampleCartArgs {
    /// Fixture set to use for the products, promotions & cart
    #[clap(short, long, default_value = "homeware")]
    pub fixture: String,

    /// Evaluate promotions at this instant instead of now (e.g. 2026-06-01T09:00:00Z)
    #[clap(long)]
    pub now: Option<Timestamp>,

    /// Skip promotion validation entirely
    #[clap(long)]
    pub disable_promotions: bool,
}
