//! Multi-Buy Rules
//!
//! Quantity deals where some units are free: `Buy 2 Get 1`, `Leve 3 Pague 2`,
//! `3 for 2`. The depth is the share of units not paid for.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{cell::ParsedCell, rules::RuleOutcome};

use super::{paid_of_total, pattern, quantity};

static BUY_GET: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Buy\s*(?:any\s*)?(\d+).*?Get\s*(\d+)"));

static ANY_GET_FREE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Any\s*(\d+).*?Get\s*(\d+)\s*[Ff]ree"));

static PLUS_FREE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d+)\s*\+\s*(\d+)\s*[Ff]ree"));

static LEVE_PAGUE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"[Ll]eve\s*(\d+)\s*[Pp]ague\s*(\d+)"));

static QTY_FOR_QTY: LazyLock<Regex> = LazyLock::new(|| pattern(r"\b(\d+)\s*[Ff]or\s*(\d+)\b"));

static FOR_GET: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d+)\s*[Ff]or\s*[Gg]et\s*(\d+)"));

static BUY_FOR_PAY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Buy\s*(\d+)[^\d]+For[^\d]+Pay\s*(\d+)"));

static ANY_THREE_FREE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)any\s*3[^0-9]*get\s*1\s*free"));

static ANY_FOUR_FREE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)any\s*4[^0-9]*get\s*1\s*free"));

/// Largest quantity read as a unit count in `A for B`.
const MAX_QTY_FOR_QTY: u64 = 10;

/// Fixed depth of `any 3 get 1 free` and `any 4 get 1 free`.
const ANY_GET_ONE_FREE_DEPTH: f64 = 25.0;

/// `Buy 2 Get 1`: pay for the bought units out of bought plus free.
///
/// `Buy 2 Get 3` is read as three for the price of two.
pub fn buy_get(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percents(BUY_GET.captures_iter(cell.promo()).filter_map(|caps| {
        let bought = quantity(&caps, 1)?;
        let got = quantity(&caps, 2)?;

        if bought == 0 || got == 0 {
            return None;
        }

        if bought == 2 && got == 3 {
            paid_of_total(2, 3)
        } else {
            paid_of_total(bought, bought.saturating_add(got))
        }
    }))
}

/// `Any 2 ... Get 1 Free`.
pub fn any_get_free(cell: &ParsedCell) -> RuleOutcome {
    bought_plus_free(cell, &ANY_GET_FREE)
}

/// `2 + 1 Free`.
pub fn plus_free(cell: &ParsedCell) -> RuleOutcome {
    bought_plus_free(cell, &PLUS_FREE)
}

/// Portuguese `Leve 3 Pague 2`: take three, pay two.
pub fn leve_pague(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percent(LEVE_PAGUE.captures(cell.promo()).and_then(|caps| {
        let total = quantity(&caps, 1)?;
        let paid = quantity(&caps, 2)?;

        (paid > 0 && paid <= total)
            .then(|| paid_of_total(paid, total))
            .flatten()
    }))
}

/// `3 for 2` between small unit counts, when no currency is mentioned.
pub fn qty_for_qty(cell: &ParsedCell) -> RuleOutcome {
    if cell.has_currency() {
        return RuleOutcome::NoMatch;
    }

    RuleOutcome::from_percents(QTY_FOR_QTY.captures_iter(cell.promo()).filter_map(|caps| {
        let a = quantity(&caps, 1)?;
        let b = quantity(&caps, 2)?;

        (a > 0 && b > 0 && a != b && a.max(b) <= MAX_QTY_FOR_QTY)
            .then(|| paid_of_total(a.min(b), a.max(b)))
            .flatten()
    }))
}

/// `2 for get 1`: take two, pay one.
pub fn for_get(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percent(
        FOR_GET
            .captures(cell.promo())
            .and_then(|caps| taken_over_paid(&caps)),
    )
}

/// `Buy 3 For Pay 2`.
pub fn buy_for_pay(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percents(
        BUY_FOR_PAY
            .captures_iter(cell.promo())
            .filter_map(|caps| taken_over_paid(&caps)),
    )
}

/// `any 3 get 1 free` and `any 4 get 1 free` are booked at a flat 25%.
pub fn any_three_or_four_free(cell: &ParsedCell) -> RuleOutcome {
    let promo = cell.promo();

    RuleOutcome::from_percents(
        [&ANY_THREE_FREE, &ANY_FOUR_FREE]
            .into_iter()
            .filter(|offer| offer.is_match(promo))
            .map(|_| ANY_GET_ONE_FREE_DEPTH),
    )
}

fn bought_plus_free(cell: &ParsedCell, offer: &Regex) -> RuleOutcome {
    RuleOutcome::from_percents(offer.captures_iter(cell.promo()).filter_map(|caps| {
        let bought = quantity(&caps, 1)?;
        let free = quantity(&caps, 2)?;

        (bought > 0 && free > 0)
            .then(|| paid_of_total(bought, bought.saturating_add(free)))
            .flatten()
    }))
}

/// Group 1 is the number of units taken, group 2 the number paid for.
fn taken_over_paid(caps: &Captures<'_>) -> Option<f64> {
    let total = quantity(caps, 1)?;
    let paid = quantity(caps, 2)?;

    (paid > 0 && total > paid)
        .then(|| paid_of_total(paid, total))
        .flatten()
}
