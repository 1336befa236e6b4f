//! Integration tests for single-cell depth inference.
//!
//! Covers the documented examples plus the properties every depth must have:
//! total over any input, within `[0, 100]`, and rounded to two decimals.

use promo_depth::prelude::*;

fn assert_depth(cell: &str, expected: f64) {
    let depth = compute_depth(cell);

    assert!(
        (depth - expected).abs() < 1e-9,
        "{cell:?}: expected {expected}, got {depth}"
    );
}

#[test]
fn test_documented_examples() {
    assert_depth("400 - Save 33%", 33.0);
    assert_depth("200 - Buy 2 & Get 1 Free", 33.33);
    assert_depth("100 - 4x3", 25.0);
    assert_depth("100 - 8折", 20.0);
    assert_depth("100 - Was 100 Now 80", 20.0);
    assert_depth("100 - Receive a free bottle", 0.0);
    assert_depth("100 - 92 Decanter Points", 0.0);
    assert_depth("100 - SGD 60 ANY 2 BOTTLES", 70.0);
}

#[test]
fn test_combined_offers_take_the_lowest() {
    // 33% and 33.33% are both read; the conservative one is reported.
    assert_depth("0 - Save 33%, Buy 2 & Get 1 Free", 33.0);
}

#[test]
fn test_absent_and_unseparated_cells_are_zero() {
    assert_depth("Save 33%", 0.0);
    assert_depth("", 0.0);
    assert_depth(" - ", 0.0);

    assert!(
        compute_depth(None).abs() < f64::EPSILON,
        "absent cell must be zero"
    );
}

#[test]
fn test_ocr_typos_are_repaired() {
    assert_depth("100 - BUT 1 GRT 1 FREE", 50.0);
}

#[test]
fn test_thousands_separators_are_read() {
    assert_depth("100 - Was 2,000 Now 1,500", 25.0);
}

#[test]
fn test_full_width_digits_are_read() {
    assert_depth("100 - ８折", 20.0);
    assert_depth("100 - ２０% off", 20.0);
    assert_depth("100 - Buy ２ Get １ Free", 33.33);
    assert_depth("100 - ４x３", 25.0);
    assert_depth("１００ - Save 20", 16.67);
}

#[test]
fn test_huge_quantities_do_not_drop_the_offer() {
    assert_depth("100 - Buy 5000000000 Get 1, Save 10%", 0.0);
}

#[test]
fn test_depths_are_bounded_and_rounded() {
    let cells = [
        "400 - Save 33%",
        "200 - Buy 2 & Get 1 Free",
        "100 - 150% off",
        "100 - 2 for 1",
        "10 - Was 1,000,000 Now 1",
        "100 - Buy 1 For 7.950 On Purchase Of 2 Bottles",
        "- 3 for 2, 4x3, Leve 5 Pague 4, 45 each or 80 for 2",
        "garbage - !!! ??? ---",
    ];

    for cell in cells {
        let depth = compute_depth(cell);

        assert!((0.0..=100.0).contains(&depth), "{cell:?}: {depth} out of range");

        let cents = depth * 100.0;

        assert!(
            (cents - cents.round()).abs() < 1e-6,
            "{cell:?}: {depth} has more than two decimals"
        );
    }
}

#[test]
fn test_evaluation_explains_the_decision() {
    let decided = evaluate("100 - SGD 60 ANY 2 BOTTLES");

    assert_eq!(decided.decided_by(), Some("sgd-any-two-bottles"));

    let aggregated = evaluate("400 - Save 33%");
    let lowest = aggregated
        .candidates()
        .and_then(CandidatePool::lowest)
        .map(|candidate| candidate.rule);

    assert_eq!(lowest, Some("percent"));
}

#[test]
fn test_normalize_is_idempotent() {
    for text in ["1,234.5 off", "Save 12,5%", "but 2 grt 1", "1,2,3"] {
        let once = normalize(text);

        assert_eq!(normalize(&once), once, "{text:?}");
    }
}
