//! Promo Rules
//!
//! Each rule is a pure function over a [`ParsedCell`]. Gate rules may decide
//! the final depth outright; catalog rules only contribute candidates, which
//! the aggregator reduces afterwards.

use regex::{Captures, Regex};
use smallvec::SmallVec;

use crate::{candidates::clamp_candidate, cell::ParsedCell, normalize::fold_digits};

pub mod gate;
pub mod multibuy;
pub mod percent;
pub mod price;
pub mod unit;

/// What a single rule concluded about a promo cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The rule's pattern is absent or its preconditions failed.
    NoMatch,

    /// One or more candidate discount percentages, each in (0, 100].
    Candidates(SmallVec<[f64; 4]>),

    /// The final depth; the remaining rules are skipped.
    Terminal(f64),
}

impl RuleOutcome {
    /// Build an outcome from raw percentages, dropping the non-positive ones.
    pub fn from_percents(percents: impl IntoIterator<Item = f64>) -> Self {
        let found: SmallVec<[f64; 4]> = percents.into_iter().filter_map(clamp_candidate).collect();

        if found.is_empty() {
            RuleOutcome::NoMatch
        } else {
            RuleOutcome::Candidates(found)
        }
    }

    /// Build an outcome from an optional single percentage.
    pub fn from_percent(percent: Option<f64>) -> Self {
        Self::from_percents(percent)
    }

    /// Candidate percentages carried by this outcome, if any.
    pub fn candidates(&self) -> &[f64] {
        match self {
            RuleOutcome::Candidates(found) => found,
            RuleOutcome::NoMatch | RuleOutcome::Terminal(_) => &[],
        }
    }
}

/// A named promo rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable rule name used in traces and logs.
    pub name: &'static str,

    /// The rule body.
    pub apply: fn(&ParsedCell) -> RuleOutcome,
}

impl Rule {
    /// Create a new rule.
    pub const fn new(name: &'static str, apply: fn(&ParsedCell) -> RuleOutcome) -> Self {
        Self { name, apply }
    }

    /// Run the rule against a parsed cell.
    pub fn evaluate(&self, cell: &ParsedCell) -> RuleOutcome {
        (self.apply)(cell)
    }
}

/// Gate rules, in evaluation order. The first terminal outcome wins.
pub const GATE: &[Rule] = &[
    Rule::new("ocr-bottle-override", gate::ocr_bottle_override),
    Rule::new("sgd-any-two-bottles", gate::sgd_any_two_bottles),
    Rule::new("sgd-off-two-bottles", gate::sgd_off_two_bottles),
    Rule::new("gift-with-purchase", gate::gift_with_purchase),
    Rule::new("device-bundle", gate::device_bundle),
    Rule::new("plain-combo", gate::plain_combo),
    Rule::new("rating-only", gate::rating_only),
];

/// Candidate rules. Order does not affect the result since the lowest
/// candidate is taken, but traces list candidates in this order.
pub const CATALOG: &[Rule] = &[
    Rule::new("up-to", percent::up_to),
    Rule::new("a-x-b", percent::a_x_b),
    Rule::new("percent", percent::percent),
    Rule::new("zhe", percent::zhe),
    Rule::new("was-now", price::was_now),
    Rule::new("currency-pair", price::currency_pair),
    Rule::new("save", price::save),
    Rule::new("money-off", price::money_off),
    Rule::new("yen-off", price::yen_off),
    Rule::new("buy-get", multibuy::buy_get),
    Rule::new("any-get-free", multibuy::any_get_free),
    Rule::new("plus-free", multibuy::plus_free),
    Rule::new("leve-pague", multibuy::leve_pague),
    Rule::new("qty-for-qty", multibuy::qty_for_qty),
    Rule::new("for-get", multibuy::for_get),
    Rule::new("buy-for-pay", multibuy::buy_for_pay),
    Rule::new("qty-for-price", unit::qty_for_price),
    Rule::new("price-for-qty", unit::price_for_qty),
    Rule::new("buy-pay", unit::buy_pay),
    Rule::new("each", price::each),
    Rule::new("unit-price", price::unit_price),
    Rule::new("buy-one-get-second", unit::buy_one_get_second),
    Rule::new("buy-one-when-two", unit::buy_one_when_two),
    Rule::new("buy-one-for", unit::buy_one_for),
    Rule::new("tiered", unit::tiered),
    Rule::new("buy-for-save", unit::buy_for_save),
    Rule::new("each-or", unit::each_or),
    Rule::new("any-three-or-four-free", multibuy::any_three_or_four_free),
];

/// Compile a rule pattern.
#[expect(
    clippy::expect_used,
    reason = "patterns are string literals, each one is compiled by the test suite"
)]
pub(crate) fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("rule pattern is a valid regex")
}

/// Parse a decimal capture group.
pub(crate) fn decimal(caps: &Captures<'_>, group: usize) -> Option<f64> {
    fold_digits(caps.get(group)?.as_str()).parse().ok()
}

/// Parse an integer quantity capture group.
///
/// Quantities too large for `u64` saturate.
pub(crate) fn quantity(caps: &Captures<'_>, group: usize) -> Option<u64> {
    let digits = fold_digits(caps.get(group)?.as_str());

    digits.parse().ok().or_else(|| {
        (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(u64::MAX)
    })
}

/// A unit count as a float.
#[expect(
    clippy::cast_precision_loss,
    reason = "counts above 2^53 only need their magnitude"
)]
pub(crate) fn units(count: u64) -> f64 {
    count as f64
}

/// Discount of paying for `paid` units out of `total`, in percent.
pub(crate) fn paid_of_total(paid: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| (1.0 - units(paid) / units(total)) * 100.0)
}

/// Discount of an effective unit price against a reference price, in percent.
///
/// Only defined when the unit price is actually below the reference.
pub(crate) fn below_reference(unit: f64, reference: f64) -> Option<f64> {
    (unit < reference && reference > 0.0).then(|| (1.0 - unit / reference) * 100.0)
}

/// A saving expressed against the pre-saving price, in percent.
pub(crate) fn saving_of(saving: f64, original: f64) -> Option<f64> {
    (original > 0.0).then(|| saving / original * 100.0)
}
