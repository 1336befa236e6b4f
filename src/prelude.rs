//! Promo Depth prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    batch::{BatchError, DEPTH_COLUMN, DepthRow, DepthSheet, PROMO_COLUMNS, QC_THRESHOLD},
    candidates::{Candidate, CandidatePool, round_percent},
    cell::ParsedCell,
    engine::{Evaluation, compute_depth, evaluate, evaluate_parsed},
    fixtures::{FixtureError, Mismatch, RegressionCase, RegressionSet},
    normalize::normalize,
    report::{ReportError, write_preview, write_summary},
    rules::{Rule, RuleOutcome},
};
