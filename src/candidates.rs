//! Candidate Discounts
//!
//! Matched rules each propose a discount; the lowest proposal is taken as the
//! cell's promo depth so that markdowns are never overstated.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use smallvec::SmallVec;

/// Upper bound of any depth, in percent.
pub const MAX_PERCENT: f64 = 100.0;

/// A discount percentage proposed by one rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Name of the rule that produced the candidate.
    pub rule: &'static str,

    /// Proposed discount in percent, within (0, 100].
    pub percent: f64,
}

/// All candidates gathered for one cell.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    candidates: SmallVec<[Candidate; 8]>,
}

impl CandidatePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate, ignoring percentages that are not strictly positive.
    pub fn push(&mut self, rule: &'static str, percent: f64) {
        if let Some(percent) = clamp_candidate(percent) {
            self.candidates.push(Candidate { rule, percent });
        }
    }

    /// Add every percentage from one rule.
    pub fn extend(&mut self, rule: &'static str, percents: &[f64]) {
        for &percent in percents {
            self.push(rule, percent);
        }
    }

    /// Number of candidates collected.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether no rule produced a candidate.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate over the candidates in the order they were produced.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// The lowest candidate, if any.
    pub fn lowest(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .min_by(|a, b| a.percent.total_cmp(&b.percent))
    }

    /// Reduce the pool to a final depth: the lowest candidate, clamped and
    /// rounded to two decimals, or `0.0` when the pool is empty.
    pub fn aggregate(&self) -> f64 {
        self.lowest()
            .map_or(0.0, |candidate| round_percent(candidate.percent))
    }
}

impl<'a> IntoIterator for &'a CandidatePool {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Keep a candidate only when it is strictly positive, capping it at 100.
pub(crate) fn clamp_candidate(percent: f64) -> Option<f64> {
    (percent > 0.0).then(|| percent.min(MAX_PERCENT))
}

/// Clamp a percentage to `[0, 100]` and round it to two decimals, ties to even.
///
/// Non-finite input rounds to `0.0`.
pub fn round_percent(percent: f64) -> f64 {
    let Some(value) = Decimal::from_f64_retain(percent.clamp(0.0, MAX_PERCENT)) else {
        return 0.0;
    };

    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_pool_aggregates_to_zero() {
        let pool = CandidatePool::new();

        assert!(pool.is_empty());
        assert_close(pool.aggregate(), 0.0);
    }

    #[test]
    fn aggregate_takes_the_lowest_candidate() {
        let mut pool = CandidatePool::new();

        pool.push("percent", 33.0);
        pool.push("buy-get", 100.0 / 3.0);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.lowest().map(|c| c.rule), Some("percent"));
        assert_close(pool.aggregate(), 33.0);
    }

    #[test]
    fn aggregate_never_sums_candidates() {
        let mut pool = CandidatePool::new();

        pool.extend("percent", &[10.0, 50.0]);

        assert_close(pool.aggregate(), 10.0);
    }

    #[test]
    fn push_ignores_non_positive_values() {
        let mut pool = CandidatePool::new();

        pool.push("was-now", 0.0);
        pool.push("was-now", -12.0);

        assert!(pool.is_empty());
    }

    #[test]
    fn push_caps_values_at_one_hundred() {
        let mut pool = CandidatePool::new();

        pool.push("percent", 250.0);

        assert_close(pool.aggregate(), 100.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_close(round_percent(100.0 / 3.0), 33.33);
        assert_close(round_percent(200.0 / 3.0), 66.67);
        assert_close(round_percent(12.0), 12.0);
    }

    #[test]
    fn rounds_exact_ties_to_even() {
        // 12.125 and 12.375 are exactly representable in binary.
        assert_close(round_percent(12.125), 12.12);
        assert_close(round_percent(12.375), 12.38);
    }

    #[test]
    fn rounding_clamps_out_of_range_values() {
        assert_close(round_percent(-4.0), 0.0);
        assert_close(round_percent(140.0), 100.0);
        assert_close(round_percent(f64::NAN), 0.0);
    }
}
