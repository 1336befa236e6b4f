//! Price Comparison Rules
//!
//! Offers that quote two prices, or a price and a saving, so the depth follows
//! from comparing them. Where only one side is quoted the cell's base price
//! stands in for the other.

use std::sync::LazyLock;

use regex::Regex;

use crate::{cell::ParsedCell, rules::RuleOutcome};

use super::{below_reference, decimal, pattern, saving_of};

static WAS: LazyLock<Regex> = LazyLock::new(|| pattern(r"[Ww]as[^\d]*([0-9]+(?:\.[0-9]+)?)"));

static NOW: LazyLock<Regex> = LazyLock::new(|| pattern(r"[Nn]ow[^\d]*([0-9]+(?:\.[0-9]+)?)"));

static SAVE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)save[^\d]*([0-9]+(?:\.[0-9]+)?)"));

static MONEY_OFF: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*off\b"));

static YEN_OFF: LazyLock<Regex> = LazyLock::new(|| pattern(r"([0-9]+)\s*円引き"));

static EACH: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*each"));

static UNIT_PRICE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Unit Price\s*([0-9]+(?:\.[0-9]+)?)"));

/// Characters after a `Save N` that may hold the `%` of a percentage saving.
const SAVE_PERCENT_LOOKAHEAD: usize = 3;

/// `Was 100 Now 80`; without a `Now` price the base price is the new price.
pub fn was_now(cell: &ParsedCell) -> RuleOutcome {
    let Some(old) = WAS
        .captures(cell.promo())
        .and_then(|caps| decimal(&caps, 1))
    else {
        return RuleOutcome::NoMatch;
    };

    let new = now_price(cell).or(cell.base_price());

    RuleOutcome::from_percent(new.and_then(|new| markdown(old, new)))
}

/// `SGD 80 (100)`: exactly two prices next to a currency, old one first.
///
/// Only consulted when the text has no `was`.
pub fn currency_pair(cell: &ParsedCell) -> RuleOutcome {
    if WAS.is_match(cell.promo()) || !cell.has_currency() {
        return RuleOutcome::NoMatch;
    }

    let mut numbers = cell.numbers();

    let (Some(old), Some(new), None) = (numbers.next(), numbers.next(), numbers.next()) else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percent(markdown(old, new))
}

/// `Save 20`: a money saving on the `Now` price, or on the base price.
///
/// `Save 20%` is left to the percentage rule.
pub fn save(cell: &ParsedCell) -> RuleOutcome {
    let promo = cell.promo();
    let now = now_price(cell);

    RuleOutcome::from_percents(SAVE.captures_iter(promo).filter_map(|caps| {
        let amount = caps.get(1)?;

        if is_followed_by_percent(promo, amount.end()) {
            return None;
        }

        let saving = decimal(&caps, 1)?;

        match now {
            Some(now) => saving_of(saving, now + saving),
            None => saving_of(saving, cell.base_price()? + saving),
        }
    }))
}

/// `20 off`: a money saving on the base price.
pub fn money_off(cell: &ParsedCell) -> RuleOutcome {
    off_base(cell, &MONEY_OFF)
}

/// `500円引き`: a yen saving on the base price.
pub fn yen_off(cell: &ParsedCell) -> RuleOutcome {
    off_base(cell, &YEN_OFF)
}

/// `45 each`: a unit price below the base price.
pub fn each(cell: &ParsedCell) -> RuleOutcome {
    unit_below_base(cell, &EACH)
}

/// `Unit Price 45`: a unit price below the base price.
pub fn unit_price(cell: &ParsedCell) -> RuleOutcome {
    unit_below_base(cell, &UNIT_PRICE)
}

fn now_price(cell: &ParsedCell) -> Option<f64> {
    NOW.captures(cell.promo())
        .and_then(|caps| decimal(&caps, 1))
}

/// Markdown from `old` to `new`, defined only for an actual reduction.
fn markdown(old: f64, new: f64) -> Option<f64> {
    (old > new && new > 0.0).then(|| (1.0 - new / old) * 100.0)
}

fn is_followed_by_percent(text: &str, at: usize) -> bool {
    text.get(at..)
        .is_some_and(|rest| rest.chars().take(SAVE_PERCENT_LOOKAHEAD).any(|c| c == '%'))
}

fn off_base(cell: &ParsedCell, amounts: &Regex) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percents(amounts.captures_iter(cell.promo()).filter_map(|caps| {
        let saving = decimal(&caps, 1)?;

        saving_of(saving, base + saving)
    }))
}

fn unit_below_base(cell: &ParsedCell, unit: &Regex) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percent(
        unit.captures(cell.promo())
            .and_then(|caps| decimal(&caps, 1))
            .and_then(|unit| below_reference(unit, base)),
    )
}
