//! Unit Price Rules
//!
//! Multi-unit prices (`2 for 30`, `BUY 2 PAY 30`, `Buy 1 for 20, 2 for 35`)
//! reduced to an effective unit price and compared with a reference price,
//! usually the cell's base price.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{cell::ParsedCell, rules::RuleOutcome};

use super::{below_reference, decimal, pattern, quantity, saving_of, units};

static QTY_FOR_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(\d+)\s*(?:for|For|FOR|x|X|@)\s*[^\d]*([0-9]+(?:\.[0-9]+)?)")
});

static PRICE_FOR_QTY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"([0-9]+(?:\.[0-9]+)?)\s*[^\d]*[Ff]or\s*(\d+)\b"));

static BUY_PAY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)BUY\s*(\d+)\s*PAY[^\d]*([0-9]+(?:\.[0-9]+)?)"));

static BUY_ONE_GET_SECOND: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Buy\s*1[^0-9]+Get\s*2nd[^\d]*([0-9]+(?:\.[0-9]+)?)"));

static BUY_ONE_WHEN_TWO: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)Buy\s*1\s*For[^\d]*([0-9]+(?:\.[0-9]+)?)\s*(?:On Purchase Of|when purchase|when purches|when pueches)\s*2",
    )
});

static WHEN_TWO_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)(On Purchase Of|when purchase|when purches|when pueches)\s*2")
});

static BUY_ONE_FOR: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Buy\s*1\s*For[^\d]*([0-9]+(?:\.[0-9]+)?)"));

static TIERED: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)Buy\s*1\s*for[^\d]*([0-9]+(?:\.[0-9]+)?)[^\d]+2\s*for[^\d]*([0-9]+(?:\.[0-9]+)?)",
    )
});

static BUY_FOR_SAVE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)BUY\s*(\d+)\s*FOR\s*([0-9]+(?:\.[0-9]+)?)\s*SAVE\s*([0-9]+(?:\.[0-9]+)?)")
});

static EACH_OR: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)each.*?([0-9]+(?:\.[0-9]+)?)\s*[^\d]*[Ff]or\s*(\d+)\b")
});

/// Largest quantity read as a unit count in `2 for 30` and `30 for 2`.
const MAX_MULTI_UNIT_QTY: u64 = 10;

/// `2 for 30`, `2x30`, `2 @ 30`: a price for a quantity.
pub fn qty_for_price(cell: &ParsedCell) -> RuleOutcome {
    multi_unit(cell, &QTY_FOR_PRICE, |caps| {
        Some((quantity(caps, 1)?, decimal(caps, 2)?))
    })
}

/// `30 for 2`: a price, then the quantity it buys.
pub fn price_for_qty(cell: &ParsedCell) -> RuleOutcome {
    multi_unit(cell, &PRICE_FOR_QTY, |caps| {
        Some((quantity(caps, 2)?, decimal(caps, 1)?))
    })
}

/// `BUY 2 PAY 30`.
pub fn buy_pay(cell: &ParsedCell) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percents(BUY_PAY.captures_iter(cell.promo()).filter_map(|caps| {
        let qty = quantity(&caps, 1)?;
        let total = decimal(&caps, 2)?;

        (qty > 0 && total > 0.0)
            .then(|| below_reference(total / units(qty), base))
            .flatten()
    }))
}

/// `Buy 1 Get 2nd for 10`: two units for base plus the second-unit price.
pub fn buy_one_get_second(cell: &ParsedCell) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percent(
        BUY_ONE_GET_SECOND
            .captures(cell.promo())
            .and_then(|caps| decimal(&caps, 1))
            .and_then(|second| below_reference((base + second) / 2.0, base)),
    )
}

/// `Buy 1 For 40 when purchase 2`: the quoted price is the unit price when
/// buying two, measured against two units at base price.
pub fn buy_one_when_two(cell: &ParsedCell) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percent(
        BUY_ONE_WHEN_TWO
            .captures(cell.promo())
            .and_then(|caps| decimal(&caps, 1))
            .filter(|unit| *unit > 0.0)
            .map(|unit| (1.0 - base / (2.0 * unit)) * 100.0),
    )
}

/// `Buy 1 For 40` with no two-unit condition attached.
pub fn buy_one_for(cell: &ParsedCell) -> RuleOutcome {
    let promo = cell.promo();

    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    if WHEN_TWO_SUFFIX.is_match(promo) {
        return RuleOutcome::NoMatch;
    }

    RuleOutcome::from_percent(
        BUY_ONE_FOR
            .captures(promo)
            .and_then(|caps| decimal(&caps, 1))
            .and_then(|price| below_reference(price, base)),
    )
}

/// `Buy 1 for 20, 2 for 35`: the two-unit tier against the single-unit price.
pub fn tiered(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percent(TIERED.captures(cell.promo()).and_then(|caps| {
        let single = decimal(&caps, 1)?;
        let pair = decimal(&caps, 2)?;

        below_reference(pair / 2.0, single)
    }))
}

/// `BUY 2 FOR 50 SAVE 10`: the saving against the promo total plus saving.
pub fn buy_for_save(cell: &ParsedCell) -> RuleOutcome {
    RuleOutcome::from_percent(BUY_FOR_SAVE.captures(cell.promo()).and_then(|caps| {
        let total = decimal(&caps, 2)?;
        let saving = decimal(&caps, 3)?;

        (total > 0.0 && saving > 0.0)
            .then(|| saving_of(saving, total + saving))
            .flatten()
    }))
}

/// `45 each or 80 for 2`: the multi-unit price quoted after an `each` price.
pub fn each_or(cell: &ParsedCell) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percent(EACH_OR.captures(cell.promo()).and_then(|caps| {
        let total = decimal(&caps, 1)?;
        let qty = quantity(&caps, 2)?;

        (qty > 0 && total > 0.0)
            .then(|| below_reference(total / units(qty), base))
            .flatten()
    }))
}

/// Effective unit price of every `(quantity, total)` match, against base.
fn multi_unit(
    cell: &ParsedCell,
    offer: &Regex,
    read: impl Fn(&Captures<'_>) -> Option<(u64, f64)>,
) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    RuleOutcome::from_percents(offer.captures_iter(cell.promo()).filter_map(|caps| {
        let (qty, total) = read(&caps)?;

        (qty > 0 && qty <= MAX_MULTI_UNIT_QTY && total > 0.0)
            .then(|| below_reference(total / units(qty), base))
            .flatten()
    }))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn candidates(rule: fn(&ParsedCell) -> RuleOutcome, cell: &str) -> Result<Vec<f64>, String> {
        let parsed = ParsedCell::parse(cell).ok_or_else(|| format!("no promo in {cell:?}"))?;

        Ok(rule(&parsed).candidates().to_vec())
    }

    fn assert_all_close(found: &[f64], expected: &[f64]) {
        assert_eq!(found.len(), expected.len(), "got {found:?}, expected {expected:?}");

        for (actual, expected) in found.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-9, "got {found:?}");
        }
    }

    #[test]
    fn qty_for_price_compares_unit_with_base() -> TestResult {
        assert_all_close(&candidates(qty_for_price, "20 - 2 for $30")?, &[25.0]);
        assert_all_close(&candidates(qty_for_price, "20 - 2 @ 30")?, &[25.0]);
        assert!(candidates(qty_for_price, "20 - 12 for 30")?.is_empty());
        assert!(candidates(qty_for_price, "- 2 for 30")?.is_empty());

        Ok(())
    }

    #[test]
    fn price_for_qty_compares_unit_with_base() -> TestResult {
        assert_all_close(&candidates(price_for_qty, "20 - $30 for 2")?, &[25.0]);
        assert!(candidates(price_for_qty, "10 - $30 for 2")?.is_empty());

        Ok(())
    }

    #[test]
    fn buy_pay_compares_unit_with_base() -> TestResult {
        assert_all_close(&candidates(buy_pay, "20 - BUY 2 PAY $30")?, &[25.0]);

        Ok(())
    }

    #[test]
    fn buy_one_get_second_averages_two_units() -> TestResult {
        assert_all_close(&candidates(buy_one_get_second, "40 - Buy 1, Get 2nd for 20")?, &[25.0]);

        Ok(())
    }

    #[test]
    fn buy_one_when_two_measures_two_units() -> TestResult {
        assert_all_close(
            &candidates(buy_one_when_two, "60 - Buy 1 For 40 when purchase 2")?,
            &[25.0],
        );
        assert!(candidates(buy_one_when_two, "60 - Buy 1 For 0 when purchase 2")?.is_empty());

        Ok(())
    }

    #[test]
    fn buy_one_for_skips_two_unit_conditions() -> TestResult {
        assert_all_close(&candidates(buy_one_for, "40 - Buy 1 For 30")?, &[25.0]);
        assert!(candidates(buy_one_for, "60 - Buy 1 For 40 when purches 2")?.is_empty());

        Ok(())
    }

    #[test]
    fn tiered_needs_no_base_price() -> TestResult {
        assert_all_close(&candidates(tiered, "- Buy 1 for 20, 2 for 30")?, &[25.0]);
        assert!(candidates(tiered, "- Buy 1 for 20, 2 for 40")?.is_empty());

        Ok(())
    }

    #[test]
    fn buy_for_save_measures_saving_on_total() -> TestResult {
        assert_all_close(&candidates(buy_for_save, "- BUY 2 FOR 75 SAVE 25")?, &[25.0]);

        Ok(())
    }

    #[test]
    fn each_or_reads_the_multi_unit_price() -> TestResult {
        assert_all_close(&candidates(each_or, "20 - 20 each or 30 for 2")?, &[25.0]);

        Ok(())
    }
}
