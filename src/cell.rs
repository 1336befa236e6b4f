//! Promo Cells
//!
//! A price-list cell reads `BASE - promo text`: the left side carries the
//! shelf price the promotion is measured against, the right side the free-form
//! promotion wording.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    normalize::{fold_digits, normalize_numbers, repair_ocr_typos},
    rules::pattern,
};

static SIGNED_DECIMAL: LazyLock<Regex> = LazyLock::new(|| pattern(r"[-+]?\d*\.?\d+"));

static NUMBER: LazyLock<Regex> = LazyLock::new(|| pattern(r"[0-9]+(?:\.[0-9]+)?"));

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"€|\$|£|¥|hk\$|sgd|aed|₹|rs|nt\$|cny|krw|php"));

/// A promo cell split into its base price and normalised promo text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCell {
    base_price: Option<f64>,
    raw_promo: String,
    promo: String,
    folded: String,
}

impl ParsedCell {
    /// Split and normalise a raw cell.
    ///
    /// Returns `None` when the cell has no `-` separator or no promo text
    /// after it; such cells carry no promotion.
    pub fn parse(cell: &str) -> Option<Self> {
        let (left, right) = cell.split_once('-')?;

        let raw_promo = right.replace('\t', " ").trim().to_string();

        if raw_promo.is_empty() {
            return None;
        }

        let numbers = normalize_numbers(&raw_promo);
        let folded = numbers.to_lowercase();
        let promo = repair_ocr_typos(&numbers);

        Some(Self {
            base_price: extract_base(left),
            raw_promo,
            promo,
            folded,
        })
    }

    /// The positive base price, if the left side carried one.
    pub fn base_price(&self) -> Option<f64> {
        self.base_price
    }

    /// Promo text as it appeared in the cell, trimmed.
    pub fn raw_promo(&self) -> &str {
        &self.raw_promo
    }

    /// Fully normalised promo text.
    pub fn promo(&self) -> &str {
        &self.promo
    }

    /// Lowercased promo text, with numbers normalised but before OCR repairs.
    ///
    /// Keyword gates and currency detection read this view.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Whether the promo text mentions a currency.
    pub fn has_currency(&self) -> bool {
        CURRENCY.is_match(&self.folded)
    }

    /// Every unsigned number in the normalised promo text, in order.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        NUMBER
            .find_iter(&self.promo)
            .filter_map(|number| number.as_str().parse().ok())
    }
}

/// Parse the base price from the left side of a cell.
///
/// Only the first number counts, and only when it is strictly positive.
pub fn extract_base(left: &str) -> Option<f64> {
    let value: f64 = fold_digits(SIGNED_DECIMAL.find(left)?.as_str()).parse().ok()?;

    (value > 0.0).then_some(value)
}
