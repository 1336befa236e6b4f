//! Promo Depth Engine
//!
//! Turns one price-list cell into a promo depth: parse the cell, run the gate
//! rules in order, then collect candidates from the rule catalog and keep the
//! lowest.
//!
//! The engine is total. Cells that cannot be read, or that no rule
//! recognises, have a depth of `0.0`.

use tracing::trace;

use crate::{
    candidates::CandidatePool,
    cell::ParsedCell,
    rules::{CATALOG, GATE, RuleOutcome},
};

/// How a cell's depth was reached.
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// The cell carries no promotion (absent, no `-`, or no promo text).
    NoPromo,

    /// A gate rule fixed the depth.
    Decided {
        /// Name of the deciding rule.
        rule: &'static str,

        /// Final depth in percent.
        depth: f64,
    },

    /// The depth is the lowest of the collected candidates.
    Aggregated(CandidatePool),
}

impl Evaluation {
    /// Final depth in percent, within `[0, 100]` and rounded to two decimals.
    pub fn depth(&self) -> f64 {
        match self {
            Evaluation::NoPromo => 0.0,
            Evaluation::Decided { depth, .. } => *depth,
            Evaluation::Aggregated(pool) => pool.aggregate(),
        }
    }

    /// Name of the gate rule that decided the depth, if one did.
    pub fn decided_by(&self) -> Option<&'static str> {
        match self {
            Evaluation::Decided { rule, .. } => Some(rule),
            Evaluation::NoPromo | Evaluation::Aggregated(_) => None,
        }
    }

    /// Candidates gathered from the rule catalog, if it ran.
    pub fn candidates(&self) -> Option<&CandidatePool> {
        match self {
            Evaluation::Aggregated(pool) => Some(pool),
            Evaluation::NoPromo | Evaluation::Decided { .. } => None,
        }
    }
}

/// Compute the promo depth of a cell, in percent.
///
/// `None` stands for a missing or non-text cell.
///
/// ```
/// use promo_depth::compute_depth;
///
/// assert_eq!(compute_depth("400 - Save 33%"), 33.0);
/// assert_eq!(compute_depth(None), 0.0);
/// ```
pub fn compute_depth<'a>(cell: impl Into<Option<&'a str>>) -> f64 {
    evaluate(cell).depth()
}

/// Evaluate a cell, keeping the trace of which rules fired.
pub fn evaluate<'a>(cell: impl Into<Option<&'a str>>) -> Evaluation {
    let Some(parsed) = cell.into().and_then(ParsedCell::parse) else {
        return Evaluation::NoPromo;
    };

    evaluate_parsed(&parsed)
}

/// Evaluate an already parsed cell.
pub fn evaluate_parsed(cell: &ParsedCell) -> Evaluation {
    for rule in GATE {
        if let RuleOutcome::Terminal(depth) = rule.evaluate(cell) {
            trace!(rule = rule.name, depth, "gate rule decided depth");

            return Evaluation::Decided {
                rule: rule.name,
                depth,
            };
        }
    }

    let mut pool = CandidatePool::new();

    for rule in CATALOG {
        let outcome = rule.evaluate(cell);
        let found = outcome.candidates();

        if !found.is_empty() {
            trace!(rule = rule.name, candidates = ?found, "rule matched");
        }

        pool.extend(rule.name, found);
    }

    Evaluation::Aggregated(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_depth(cell: &str, expected: f64) {
        let depth = compute_depth(cell);

        assert!(
            (depth - expected).abs() < 1e-9,
            "{cell:?}: expected {expected}, got {depth}"
        );
    }

    #[test]
    fn absent_cells_have_no_promo() {
        assert!(matches!(evaluate(None), Evaluation::NoPromo));
        assert!(matches!(evaluate("Save 33%"), Evaluation::NoPromo));
        assert!(matches!(evaluate("400 -   "), Evaluation::NoPromo));
    }

    #[test]
    fn gate_decisions_skip_the_catalog() {
        let evaluation = evaluate("100 - 92 Decanter Points");

        assert_eq!(evaluation.decided_by(), Some("rating-only"));
        assert!(evaluation.candidates().is_none());
        assert_depth("100 - 92 Decanter Points", 0.0);
    }

    #[test]
    fn gate_order_is_respected() {
        // Both the gift and the device gates match; the gift gate comes first.
        let evaluation = evaluate("100 - Device and sticks, receive a free bottle");

        assert_eq!(evaluation.decided_by(), Some("gift-with-purchase"));
    }

    #[test]
    fn lowest_candidate_wins() {
        let evaluation = evaluate("0 - Save 33%, Buy 2 & Get 1 Free");

        let rules: Vec<&str> = evaluation
            .candidates()
            .map(|pool| pool.iter().map(|candidate| candidate.rule).collect())
            .unwrap_or_default();

        assert!(rules.contains(&"percent"), "rules: {rules:?}");
        assert!(rules.contains(&"buy-get"), "rules: {rules:?}");
        assert_depth("0 - Save 33%, Buy 2 & Get 1 Free", 33.0);
    }

    #[test]
    fn up_to_is_a_candidate_not_a_decision() {
        let evaluation = evaluate("100 - Up to 40% off, 3 for 2");

        assert_eq!(evaluation.decided_by(), None);
        assert_depth("100 - Up to 40% off, 3 for 2", 33.33);
    }

    #[test]
    fn unrecognised_text_is_zero() {
        assert_depth("259 - Buy a bottle, get Free Bag", 0.0);
        assert_depth("100 - while stocks last", 0.0);
    }
}
