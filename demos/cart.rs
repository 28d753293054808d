//! Cart Example
//!
//! Prices a fixture cart against its promotions and prints the validation outcome.
//!
//! Use `-f` to load a fixture set by name
//! Use `--now` to evaluate promotions at a fixed instant (e.g. `2026-06-01T09:00:00Z`)
//! Use `--disable-promotions` to skip promotion validation
//!
//! Set `RUST_LOG=pricewise=debug` to see override selection and skipped promotions.

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::Timestamp;
use tracing_subscriber::EnvFilter;

use pricewise::{
    cart::validation::{CartValidator, PromotionFeed, ValidatorConfig},
    clock::FixedClock,
    fixtures::Fixture,
    report::CartReport,
    utils::ExampleCartArgs,
};

/// Cart Example
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = ExampleCartArgs::parse();
    let now = args.now.unwrap_or_else(Timestamp::now);

    let fixture = Fixture::from_set(&args.fixture)?;

    let start = Instant::now();

    let cart = fixture.cart(now)?;
    let feed = PromotionFeed::Loaded(fixture.promotions());
    let validation = CartValidator::new(FixedClock::new(now))
        .with_config(ValidatorConfig {
            enabled: !args.disable_promotions,
        })
        .validate(&cart, feed);

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    CartReport::new(&cart, &validation)
        .with_product_names(fixture.products())
        .write_to(&mut handle)?;

    writeln!(
        handle,
        " Evaluated at {now} in {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
