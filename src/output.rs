//! Output formatting and export for roster reports.
//!
//! Supports pretty-printing, JSON serialization, and flat CSV export of the
//! current view.

use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use tracing::{debug, info};

use crate::analyzers::grade::Band;
use crate::analyzers::types::RosterReport;
use crate::config::ColumnNames;
use crate::error::Result;
use crate::model::ScoredRecord;

/// Header names of the derived export columns, in output order.
pub const DERIVED_COLUMNS: [&str; 3] = ["daily_category", "test_category", "composite_score"];

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &RosterReport<'_>) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &RosterReport<'_>) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn fmt_score(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_band(band: Option<Band>) -> String {
    band.map(|b| b.to_string()).unwrap_or_default()
}

/// Writes rows as CSV: the four input columns under their configured names,
/// then [`DERIVED_COLUMNS`]. Missing values are empty cells.
pub fn write_view<'a, W, I>(writer: W, rows: I, columns: &ColumnNames) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ScoredRecord>,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    let mut header = vec![
        columns.name.as_str(),
        columns.class_label.as_str(),
        columns.daily_score.as_str(),
        columns.test_score.as_str(),
    ];
    header.extend(DERIVED_COLUMNS);
    writer.write_record(&header)?;

    let mut written = 0;
    for row in rows {
        writer.write_record([
            row.name().unwrap_or_default().to_string(),
            row.class_label().to_string(),
            fmt_score(row.record.daily_score),
            fmt_score(row.record.test_score),
            fmt_band(row.daily_category),
            fmt_band(row.test_category),
            fmt_score(row.composite_score),
        ])?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Exports rows to `path`, gzip-compressed when `gzip` is set.
pub fn write_view_csv<'a, I>(path: &str, rows: I, columns: &ColumnNames, gzip: bool) -> Result<usize>
where
    I: IntoIterator<Item = &'a ScoredRecord>,
{
    let file = File::create(path)?;
    let written = if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        let written = write_view(&mut encoder, rows, columns)?;
        encoder.finish()?;
        written
    } else {
        write_view(file, rows, columns)?
    };

    info!(path, rows = written, gzip, "Exported roster view");
    Ok(written)
}
