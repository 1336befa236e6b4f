//! Preview Report
//!
//! Terminal rendering of a converted sheet: the first rows with their depth,
//! depths above the QC threshold in red, and a one-line summary.

use std::{io, time::Duration};

use humanize_duration::{Truncate, prelude::DurationExt};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::batch::{DEPTH_COLUMN, DepthSheet, QC_THRESHOLD};

/// Rows shown by default.
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Write the first `limit` rows of a sheet as a table.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the output cannot be written.
pub fn write_preview(
    mut out: impl io::Write,
    sheet: &DepthSheet,
    limit: usize,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();
    let mut flagged_rows: SmallVec<[usize; 16]> = SmallVec::new();

    builder.push_record(["", sheet.column(), DEPTH_COLUMN]);

    for (idx, row) in sheet.rows().iter().take(limit).enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            row.promo_text().to_string(),
            format!("{:.2}", row.depth),
        ]);

        if row.needs_review() {
            // Header is table row 0.
            flagged_rows.push(idx + 1);
        }
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    for row in flagged_rows {
        table.modify((row, 2), Color::FG_RED);
    }

    writeln!(out, "\n{table}")?;

    if sheet.len() > limit {
        writeln!(out, " ... {} more rows", sheet.len() - limit)?;
    }

    Ok(())
}

/// Write the row count, the number of rows needing review and the time taken.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the output cannot be written.
pub fn write_summary(
    mut out: impl io::Write,
    sheet: &DepthSheet,
    elapsed: Duration,
) -> Result<(), ReportError> {
    let flagged = sheet.flagged().count();

    writeln!(
        out,
        " {} rows, {flagged} above {QC_THRESHOLD}% need review ({})",
        sheet.len(),
        elapsed.human(Truncate::Nano),
    )?;

    Ok(())
}
