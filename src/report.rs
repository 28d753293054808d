//! Cart report
//!
//! Plain-text rendering of a priced cart and its promotion validation outcome,
//! for the demo and for diagnostics.

use std::{fmt::Write, io};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::Money;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem, validation::PromotionValidationResult},
    money::saturating_sum_minor,
    pricing::PricingResult,
    products::{Product, ProductId},
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A priced cart together with its validation result.
#[derive(Debug)]
pub struct CartReport<'r, 'a> {
    cart: &'r Cart<'a>,
    validation: &'r PromotionValidationResult,
    names: FxHashMap<&'r ProductId, &'r str>,
}

impl<'r, 'a> CartReport<'r, 'a> {
    /// Create a report; lines are labelled by product id until names are supplied.
    pub fn new(cart: &'r Cart<'a>, validation: &'r PromotionValidationResult) -> Self {
        Self {
            cart,
            validation,
            names: FxHashMap::default(),
        }
    }

    /// Label lines with the catalog names of `products`.
    #[must_use]
    pub fn with_product_names<'b: 'r>(
        mut self,
        products: impl IntoIterator<Item = &'r Product<'b>>,
    ) -> Self {
        self.names.extend(
            products
                .into_iter()
                .map(|product| (&product.id, product.name.as_str())),
        );
        self
    }

    /// Total saved against original prices across all lines.
    pub fn savings_minor(&self) -> i64 {
        saturating_sum_minor(self.cart.items().iter().map(line_savings_minor))
    }

    /// Writes the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();
        let mut color_ops: SmallVec<[(usize, usize, Color); 16]> = SmallVec::new();

        builder.push_record(["", "Item", "Qty", "Price", "Now", "Line Total", "Badge"]);

        for (idx, item) in self.cart.items().iter().enumerate() {
            let row = idx + 1;
            let name = self
                .names
                .get(item.product_id())
                .copied()
                .unwrap_or_else(|| item.product_id().as_str());

            let (original, now) = match item.pricing() {
                Some(pricing) if pricing.has_discount() => {
                    color_ops.push((row, 4, Color::FG_GREEN));

                    (
                        pricing.original_price().to_string(),
                        pricing.display_price().to_string(),
                    )
                }
                _ => (item.unit_price().to_string(), String::new()),
            };

            builder.push_record([
                format!("#{row:<3}"),
                name.to_string(),
                item.quantity().to_string(),
                original,
                now,
                item.line_total().to_string(),
                item.pricing().map(badge).unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        for (row, col, color) in color_ops {
            table.modify((row, col), color);
        }

        writeln!(out, "\n{}", colorize_borders(&table.to_string()))?;

        self.write_summary(&mut out)?;
        self.write_promotions(&mut out)?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let savings = Money::from_minor(self.savings_minor(), self.cart.currency());

        writeln!(out, " Subtotal:  {}", self.cart.subtotal())?;
        writeln!(out, "  Savings:  {savings}")?;
        writeln!(out)?;

        Ok(())
    }

    fn write_promotions(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let validation = self.validation;

        for message in &validation.messages {
            writeln!(out, " • {message}")?;
        }

        for suggestion in &validation.suggestions {
            writeln!(out, " → {suggestion}")?;
        }

        let checkout = if validation.can_proceed_to_checkout {
            "\x1b[32mready\x1b[0m"
        } else {
            "\x1b[31mblocked\x1b[0m"
        };

        writeln!(out, "\n Checkout: {checkout}\n")?;

        Ok(())
    }
}

fn line_savings_minor(item: &CartItem<'_>) -> i64 {
    item.pricing().map_or(0, |pricing| {
        pricing
            .savings()
            .to_minor_units()
            .saturating_mul(i64::from(item.quantity()))
    })
}

/// Badge shown next to a discounted line, e.g. `-37%` or `-37% (incl. 10% extra)`.
fn badge(pricing: &PricingResult<'_>) -> String {
    if !pricing.has_discount() {
        return String::new();
    }

    let mut badge = format!("-{}%", pricing.discount_percentage());
    let extra = pricing.extra_promotional_discount();

    if extra > Decimal::ZERO {
        _ = write!(badge, " (incl. {extra}% extra)");
    }

    badge
}

/// Wraps runs of box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            out.push_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            out.push_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        out.push_str("\x1b[0m");
    }

    out
}
