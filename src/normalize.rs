//! Promo Text Normalisation
//!
//! Number formats in price lists are inconsistent (`2,199`, `12,50`) and the
//! OCR that produced many of them misreads a couple of short words. Everything
//! here is a pure string transform.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use crate::rules::pattern;

/// A comma after one to three digits, followed by exactly three digits.
static THOUSANDS: LazyLock<Regex> = LazyLock::new(|| pattern(r"\d{1,3}(,)\d{3}\b"));

/// A comma between two digits.
static DECIMAL_COMMA: LazyLock<Regex> = LazyLock::new(|| pattern(r"\d(,)\d"));

/// Zero of each non-ASCII decimal digit block seen in price lists: full-width,
/// Arabic-Indic, extended Arabic-Indic and Devanagari.
const DIGIT_ZEROS: [char; 4] = ['\u{FF10}', '\u{0660}', '\u{06F0}', '\u{0966}'];

static OCR_BUT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bbut\b"));

static OCR_GRT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bgrt\b"));

/// Fully normalise a promo string: number formats first, then OCR repairs.
pub fn normalize(raw: &str) -> String {
    repair_ocr_typos(&normalize_numbers(raw))
}

/// Remove thousands separators (`2,199` -> `2199`) and turn decimal commas
/// into points (`12,50` -> `12.50`).
pub fn normalize_numbers(text: &str) -> String {
    let without_thousands = rewrite_commas(text, &THOUSANDS, "");

    rewrite_commas(&without_thousands, &DECIMAL_COMMA, ".")
}

/// Fold decimal digits from other scripts to ASCII (`２０` -> `20`) so the
/// matched number can be parsed.
pub fn fold_digits(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.chars().map(ascii_digit).collect())
}

fn ascii_digit(c: char) -> char {
    DIGIT_ZEROS
        .iter()
        .find_map(|&zero| {
            let offset = u32::from(c).checked_sub(u32::from(zero))?;

            char::from_digit(offset, 10)
        })
        .unwrap_or(c)
}

/// Correct the two OCR misreads seen in the price lists: `but` -> `Buy` and
/// `grt` -> `Get`, whole words only.
pub fn repair_ocr_typos(text: &str) -> String {
    let text = OCR_BUT.replace_all(text, "Buy");

    OCR_GRT.replace_all(&text, "Get").into_owned()
}

/// Replace the comma captured by `separator` with `replacement` at every match.
///
/// Scanning resumes right after each comma, so the digits that follow it can
/// anchor the next match (`1,234,567` and `1,2,3` are rewritten in one pass).
fn rewrite_commas(text: &str, separator: &Regex, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search_from = 0;

    while let Some(comma) = separator
        .captures_at(text, search_from)
        .and_then(|caps| caps.get(1))
    {
        out.push_str(text.get(copied..comma.start()).unwrap_or_default());
        out.push_str(replacement);

        copied = comma.end();
        search_from = comma.end();
    }

    out.push_str(text.get(copied..).unwrap_or_default());

    out
}
