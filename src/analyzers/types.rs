//! Data types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::correlation::Correlation;
use crate::analyzers::metrics::{ColumnSummary, Histogram};
use crate::analyzers::ranking::RankedRecord;
use crate::model::ScoredRecord;

/// Summary statistics for one class; numbers rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAggregate {
    pub(crate) class_label: String,
    pub(crate) members: usize,
    pub(crate) daily_count: usize,
    pub(crate) daily_mean: Option<f64>,
    /// `None` when fewer than two daily scores are present.
    pub(crate) daily_std: Option<f64>,
    pub(crate) test_mean: Option<f64>,
    pub(crate) test_std: Option<f64>,
}

impl ClassAggregate {
    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn members(&self) -> usize {
        self.members
    }

    pub fn daily_count(&self) -> usize {
        self.daily_count
    }

    pub fn daily_mean(&self) -> Option<f64> {
        self.daily_mean
    }

    pub fn daily_std(&self) -> Option<f64> {
        self.daily_std
    }

    pub fn test_mean(&self) -> Option<f64> {
        self.test_mean
    }

    pub fn test_std(&self) -> Option<f64> {
        self.test_std
    }
}

/// Per-column statistics block of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub summary: Option<ColumnSummary>,
    pub histogram: Option<Histogram>,
}

/// Everything one analysis pass produces for a snapshot.
#[derive(Debug, Serialize)]
pub struct RosterReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub total_students: usize,
    pub daily: ColumnReport,
    pub test: ColumnReport,
    pub correlation: Correlation,
    pub classes: Vec<ClassAggregate>,
    pub top: Vec<RankedRecord<'a>>,
    pub bottom: Vec<RankedRecord<'a>>,
    /// Rows remaining after the class filter and search query, original order.
    pub view: Vec<&'a ScoredRecord>,
}
