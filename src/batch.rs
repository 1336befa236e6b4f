//! Batch Conversion
//!
//! Applies the engine to every row of a price-list export. The promo column
//! is located by label, each row gets a depth, and the result is written back
//! as a two-column sheet: the promo text and its `Promo Depth`.

use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord, Writer};
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::compute_depth;

/// Accepted labels of the promo column, in order of preference.
pub const PROMO_COLUMNS: [&str; 2] = ["Price & Promo", "Price & Promo Details"];

/// Label of the computed column.
pub const DEPTH_COLUMN: &str = "Promo Depth";

/// Depths above this many percent need a manual quality check.
pub const QC_THRESHOLD: f64 = 85.0;

/// Errors that can occur while converting a sheet.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Neither accepted promo column label is present.
    #[error("column 'Price & Promo' or 'Price & Promo Details' not found in the input")]
    MissingColumn,

    /// Malformed CSV input or failed CSV output.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File could not be opened or created.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One converted row.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthRow {
    /// Original promo cell; `None` when the row had no such field.
    pub promo: Option<String>,

    /// Computed promo depth in percent.
    pub depth: f64,
}

impl DepthRow {
    /// Compute the depth of a single cell.
    pub fn new(promo: Option<String>) -> Self {
        let depth = compute_depth(promo.as_deref());

        Self { promo, depth }
    }

    /// Promo text, empty when absent.
    pub fn promo_text(&self) -> &str {
        self.promo.as_deref().unwrap_or_default()
    }

    /// Whether the depth is high enough to need a manual check.
    pub fn needs_review(&self) -> bool {
        self.depth > QC_THRESHOLD
    }
}

/// A converted sheet.
#[derive(Debug, Clone)]
pub struct DepthSheet {
    column: String,
    rows: Vec<DepthRow>,
}

impl DepthSheet {
    /// Convert already extracted cells of the promo column named `column`.
    pub fn from_cells(
        column: impl Into<String>,
        cells: impl IntoIterator<Item = Option<String>>,
    ) -> Self {
        Self {
            column: column.into(),
            rows: cells.into_iter().map(DepthRow::new).collect(),
        }
    }

    /// Read a CSV export with a header row and convert its promo column.
    ///
    /// # Errors
    ///
    /// - [`BatchError::MissingColumn`]: no accepted promo column label.
    /// - [`BatchError::Csv`]: the input is not valid CSV.
    pub fn from_csv(reader: impl io::Read) -> Result<Self, BatchError> {
        let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let (index, column) = resolve_promo_column(&headers).ok_or(BatchError::MissingColumn)?;

        debug!(column, index, "resolved promo column");

        let cells = csv_reader
            .records()
            .map(|record| Ok(record?.get(index).map(str::to_string)))
            .collect::<Result<Vec<_>, BatchError>>()?;

        let sheet = Self::from_cells(column, cells);

        for (row, flagged) in sheet.flagged() {
            debug!(row, depth = flagged.depth, promo = flagged.promo_text(), "flagged for review");
        }

        info!(
            rows = sheet.len(),
            flagged = sheet.flagged().count(),
            "converted promo sheet"
        );

        Ok(sheet)
    }

    /// Read and convert a CSV file.
    ///
    /// # Errors
    ///
    /// As [`DepthSheet::from_csv`], plus [`BatchError::Io`] if the file cannot
    /// be opened.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        Self::from_csv(File::open(path)?)
    }

    /// Write the promo column and the depth column as CSV.
    ///
    /// Depths are written with two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Csv`] if writing fails.
    pub fn write_csv(&self, writer: impl io::Write) -> Result<(), BatchError> {
        let mut csv_writer = Writer::from_writer(writer);

        csv_writer.write_record([self.column.as_str(), DEPTH_COLUMN])?;

        for row in &self.rows {
            let depth = format!("{:.2}", row.depth);

            csv_writer.write_record([row.promo_text(), depth.as_str()])?;
        }

        csv_writer.flush()?;

        Ok(())
    }

    /// Write the converted sheet to a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Io`] if the file cannot be created, or
    /// [`BatchError::Csv`] if writing fails.
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<(), BatchError> {
        self.write_csv(File::create(path)?)
    }

    /// Label of the promo column the sheet was read from.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Converted rows, in input order.
    pub fn rows(&self) -> &[DepthRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows needing review, with their zero-based row index.
    pub fn flagged(&self) -> impl Iterator<Item = (usize, &DepthRow)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.needs_review())
    }
}

/// Find the promo column among CSV headers.
///
/// `Price & Promo` is preferred over `Price & Promo Details` when both exist.
pub fn resolve_promo_column(headers: &StringRecord) -> Option<(usize, &'static str)> {
    PROMO_COLUMNS.iter().find_map(|&label| {
        headers
            .iter()
            .position(|header| header == label)
            .map(|index| (index, label))
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn prefers_the_short_label() {
        let headers = StringRecord::from(vec!["Price & Promo Details", "SKU", "Price & Promo"]);

        assert_eq!(resolve_promo_column(&headers), Some((2, "Price & Promo")));
    }

    #[test]
    fn accepts_the_details_label() {
        let headers = StringRecord::from(vec!["SKU", "Price & Promo Details"]);

        assert_eq!(
            resolve_promo_column(&headers),
            Some((1, "Price & Promo Details"))
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        let input = "SKU,Promo\n1,400 - Save 33%\n";

        assert!(matches!(
            DepthSheet::from_csv(input.as_bytes()),
            Err(BatchError::MissingColumn)
        ));
    }

    #[test]
    fn short_rows_have_no_promo() -> TestResult {
        let input = "SKU,Price & Promo\n1,400 - Save 33%\n2\n";
        let sheet = DepthSheet::from_csv(input.as_bytes())?;

        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.rows().get(1).and_then(|row| row.promo.clone()), None);
        assert_eq!(sheet.rows().get(1).map(|row| row.depth), Some(0.0));

        Ok(())
    }

    #[test]
    fn flags_depths_above_threshold() {
        let sheet = DepthSheet::from_cells(
            "Price & Promo",
            [
                Some("100 - 90% off".to_string()),
                Some("100 - 85% off".to_string()),
            ],
        );

        let flagged: Vec<usize> = sheet.flagged().map(|(row, _)| row).collect();

        assert_eq!(flagged, vec![0]);
    }

    #[test]
    fn writes_two_columns_with_two_decimals() -> TestResult {
        let sheet = DepthSheet::from_cells(
            "Price & Promo Details",
            [Some("200 - Buy 2 & Get 1 Free".to_string()), None],
        );

        let mut out = Vec::new();
        sheet.write_csv(&mut out)?;

        assert_eq!(
            String::from_utf8(out)?,
            "Price & Promo Details,Promo Depth\n200 - Buy 2 & Get 1 Free,33.33\n,0.00\n"
        );

        Ok(())
    }
}
