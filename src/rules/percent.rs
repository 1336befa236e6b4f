//! Percentage Rules
//!
//! Offers that state their depth directly: `Save 20%`, `up to 40%`, `4x3`
//! and the Chinese `折` notation.

use std::sync::LazyLock;

use regex::Regex;

use crate::{cell::ParsedCell, rules::RuleOutcome};

use super::{decimal, paid_of_total, pattern, quantity};

static UP_TO: LazyLock<Regex> = LazyLock::new(|| pattern(r"up\s*to\s*(\d+(?:\.\d+)?)\s*%"));

static A_X_B: LazyLock<Regex> = LazyLock::new(|| pattern(r"\b(\d+)\s*[xX]\s*(\d+)\b"));

static PERCENT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d+(?:\.\d+)?)\s*%"));

static ZHE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d+(?:\.[0-9]+)?)\s*折"));

/// `UP TO 40% OFF`, read as the stated ceiling.
pub fn up_to(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percent(
        UP_TO
            .captures(cell.folded())
            .and_then(|caps| decimal(&caps, 1)),
    )
}

/// `4x3`: take four, pay for three.
pub fn a_x_b(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percents(A_X_B.captures_iter(cell.promo()).filter_map(|caps| {
        let total = quantity(&caps, 1)?;
        let paid = quantity(&caps, 2)?;

        (paid > 0 && total > paid)
            .then(|| paid_of_total(paid, total))
            .flatten()
    }))
}

/// Any explicit `N%`.
pub fn percent(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percents(
        PERCENT
            .captures_iter(cell.promo())
            .filter_map(|caps| decimal(&caps, 1)),
    )
}

/// `8折` means paying eight tenths of the price.
pub fn zhe(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percents(ZHE.captures_iter(cell.promo()).filter_map(|caps| {
        let tenths = decimal(&caps, 1)?;

        (tenths > 0.0 && tenths <= 10.0).then(|| (1.0 - tenths / 10.0) * 100.0)
    }))
}
