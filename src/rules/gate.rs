//! Gate Rules
//!
//! Offers whose depth is fixed by their shape alone: two hard-coded SGD bottle
//! bundles, a mis-scanned listing, and several kinds of text that mention a
//! deal without discounting the priced product.

use std::sync::LazyLock;

use regex::Regex;

use crate::{candidates::round_percent, cell::ParsedCell, rules::RuleOutcome};

use super::pattern;

/// Listing whose promo price was scanned as `7.950` instead of `7,950`.
const OCR_BOTTLE_PHRASE: &str = "Buy 1 For 7.950 On Purchase Of 2 Bottles";

/// Shelf price the mis-scanned listing is measured against.
const OCR_BOTTLE_BASE: f64 = 10_590.0;

/// Corrected per-bottle promo price of the mis-scanned listing.
const OCR_BOTTLE_UNIT: f64 = 7_950.0;

/// Fixed amount of the SGD bottle bundles.
const SGD_BUNDLE_AMOUNT: f64 = 60.0;

const RATING_KEYWORDS: [&str; 8] = [
    "points",
    "decanter",
    "world wine awards",
    "iwsc",
    "james suckling",
    "wine spectator",
    "robert parker",
    "medal",
];

const PROMO_KEYWORDS: [&str; 15] = [
    "save", "off", "buy", "get", "free", "was", "now", "discount", "offer", "deal", "pay",
    " for ", "%", "x", "@",
];

static SGD_ANY_TWO: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(sgd\s*60|60\s*sgd).*any\s*2\s*bottles"));

static SGD_OFF_TWO: LazyLock<Regex> = LazyLock::new(|| pattern(r"60\s*sgd\s*off.*2\s*bottle"));

static FREE_BOTTLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)receive a free bottle"));

static DEVICE: LazyLock<Regex> = LazyLock::new(|| pattern(r"device"));

static CONSUMABLE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"stick|sticks|carton|pods?|capsules?"));

static COMBO_PROMO_WORDS: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"get|free|glass|backpack|trolley|gift|save|off"));

/// The known mis-scanned listing: one bottle at 7,950 when buying two.
pub fn ocr_bottle_override(cell: &ParsedCell) -> RuleOutcome {
    if !cell.raw_promo().contains(OCR_BOTTLE_PHRASE) {
        return RuleOutcome::NoMatch;
    }

    RuleOutcome::Terminal(round_percent(
        (1.0 - OCR_BOTTLE_BASE / (2.0 * OCR_BOTTLE_UNIT)) * 100.0,
    ))
}

/// `SGD 60 ANY 2 BOTTLES`: two bottles for 60, against two at base price.
pub fn sgd_any_two_bottles(cell: &ParsedCell) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    if !SGD_ANY_TWO.is_match(cell.folded()) {
        return RuleOutcome::NoMatch;
    }

    RuleOutcome::Terminal(round_percent(
        (1.0 - SGD_BUNDLE_AMOUNT / (2.0 * base)) * 100.0,
    ))
}

/// `60 SGD OFF 2 Bottles`: 60 off the price of two bottles.
pub fn sgd_off_two_bottles(cell: &ParsedCell) -> RuleOutcome {
    let Some(base) = cell.base_price() else {
        return RuleOutcome::NoMatch;
    };

    if !SGD_OFF_TWO.is_match(cell.folded()) {
        return RuleOutcome::NoMatch;
    }

    RuleOutcome::Terminal(round_percent(SGD_BUNDLE_AMOUNT / (2.0 * base) * 100.0))
}

/// Gift with purchase; the priced bottle itself is not discounted.
pub fn gift_with_purchase(cell: &ParsedCell) -> RuleOutcome {
    terminal_zero_if(FREE_BOTTLE.is_match(cell.promo()))
}

/// Device sold with sticks, pods or capsules; the product's share of the
/// bundle discount cannot be isolated.
pub fn device_bundle(cell: &ParsedCell) -> RuleOutcome {
    let folded = cell.folded();

    terminal_zero_if(DEVICE.is_match(folded) && CONSUMABLE.is_match(folded))
}

/// `Combo A + B` listings with no discount wording at all.
pub fn plain_combo(cell: &ParsedCell) -> RuleOutcome {
    let folded = cell.folded();
    let promo = cell.promo();

    let is_combo = folded.contains("combo")
        && (promo.contains('+') || promo.contains('&') || folded.contains(" and "));

    terminal_zero_if(is_combo && !COMBO_PROMO_WORDS.is_match(folded))
}

/// Ratings and awards quoted in the promo column without any offer.
pub fn rating_only(cell: &ParsedCell) -> RuleOutcome {
    let folded = cell.folded();

    let mentions_rating = RATING_KEYWORDS.iter().any(|keyword| folded.contains(keyword));
    let mentions_offer = PROMO_KEYWORDS.iter().any(|keyword| folded.contains(keyword));

    terminal_zero_if(mentions_rating && !mentions_offer)
}

fn terminal_zero_if(matched: bool) -> RuleOutcome {
    if matched {
        RuleOutcome::Terminal(0.0)
    } else {
        RuleOutcome::NoMatch
    }
}
