//! CSV parser for roster feeds.
//!
//! Column resolution happens here, once: a missing header is a
//! [`RosterError::MissingColumn`], while a bad cell only becomes `None`.

use std::io::Read;

use tracing::debug;

use crate::config::ColumnNames;
use crate::error::{Result, RosterError};
use crate::model::{Dataset, Record};

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    class_label: usize,
    daily_score: usize,
    test_score: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, columns: &ColumnNames) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim() == wanted.trim())
                .ok_or_else(|| RosterError::MissingColumn {
                    column: wanted.to_string(),
                })
        };

        Ok(Self {
            name: find(&columns.name)?,
            class_label: find(&columns.class_label)?,
            daily_score: find(&columns.daily_score)?,
            test_score: find(&columns.test_score)?,
        })
    }
}

/// Decodes roster CSV bytes into a [`Dataset`].
///
/// # Errors
///
/// Returns [`RosterError::MissingColumn`] when a configured header is absent
/// and [`RosterError::Csv`] when the bytes are not readable CSV.
pub fn parse_roster(bytes: &[u8], columns: &ColumnNames) -> Result<Dataset> {
    parse_roster_reader(bytes, columns)
}

pub fn parse_roster_reader<R: Read>(reader: R, columns: &ColumnNames) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let index = ColumnIndex::resolve(rdr.headers()?, columns)?;

    let mut records = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let row = result?;
        let cell = |idx: usize| row.get(idx).map(str::trim).unwrap_or("");

        let name = match cell(index.name) {
            "" => None,
            n => Some(n.to_string()),
        };

        records.push(Record {
            name,
            class_label: cell(index.class_label).to_string(),
            daily_score: parse_score(cell(index.daily_score), row_no, &columns.daily_score),
            test_score: parse_score(cell(index.test_score), row_no, &columns.test_score),
        });
    }

    debug!(rows = records.len(), "Roster parsed");
    Ok(Dataset::new(records))
}

pub fn parse_roster_file(path: &str, columns: &ColumnNames) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    parse_roster_reader(file, columns)
}

/// Empty cells are missing; anything unparseable is dropped with a debug event.
fn parse_score(raw: &str, row: usize, column: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) if !v.is_nan() => Some(v),
        _ => {
            debug!(row, column, value = raw, "Non-numeric score excluded");
            None
        }
    }
}
