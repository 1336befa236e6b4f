//! Regression Fixtures
//!
//! Curated promo cells with the depth the business expects, kept in YAML so
//! that any change to the rule set that moves a known result is caught.
//!
//! ```yaml
//! cases:
//!   - cell: "400 - Save 33%"
//!     depth: 33.0
//!   - cell: ~
//!     depth: 0.0
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::engine::compute_depth;

/// Largest difference between an expected and a computed depth still
/// accepted as equal.
pub const DEPTH_TOLERANCE: f64 = 0.005;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// A single expected result.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegressionCase {
    /// Raw promo cell; `~` stands for an absent cell.
    pub cell: Option<String>,

    /// Expected depth in percent.
    pub depth: f64,

    /// Optional note on why the case exists.
    #[serde(default)]
    pub note: Option<String>,
}

/// A case whose computed depth differs from the expected one.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch<'a> {
    /// The failing case.
    pub case: &'a RegressionCase,

    /// Depth computed by the engine.
    pub actual: f64,
}

/// A set of regression cases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegressionSet {
    /// Cases in file order.
    pub cases: Vec<RegressionCase>,
}

impl RegressionSet {
    /// Parse a regression set from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the text is not a valid set.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load a regression set from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Evaluate every case and return the ones that do not hold.
    pub fn run(&self) -> Vec<Mismatch<'_>> {
        self.cases
            .iter()
            .filter_map(|case| {
                let actual = compute_depth(case.cell.as_deref());

                ((actual - case.depth).abs() > DEPTH_TOLERANCE).then_some(Mismatch { case, actual })
            })
            .collect()
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the set has no cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
