//! Descriptive statistics per numeric column.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::utility::{mean, percentile, sorted, stddev};
use crate::model::{Dataset, ScoreColumn};

/// min / 25% / 50% / 75% / max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined for a single observation.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub five_number: FiveNumberSummary,
}

impl ColumnSummary {
    /// Describe-style mapping. `std` is left out when undefined.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let mut map = BTreeMap::new();
        map.insert("count", self.count as f64);
        map.insert("mean", self.mean);
        if let Some(std) = self.std {
            map.insert("std", std);
        }
        map.insert("min", self.five_number.min);
        map.insert("25%", self.five_number.q1);
        map.insert("50%", self.five_number.median);
        map.insert("75%", self.five_number.q3);
        map.insert("max", self.five_number.max);
        map
    }
}

/// Mapping for a possibly-absent summary: empty when there is no data.
pub fn summary_map(summary: Option<&ColumnSummary>) -> BTreeMap<&'static str, f64> {
    summary.map(ColumnSummary::to_map).unwrap_or_default()
}

/// Summarizes a slice of values. Missing data is the caller's to filter; NaN is skipped here.
pub fn summarize(values: &[f64]) -> Option<ColumnSummary> {
    let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let avg = mean(&clean)?;
    let ordered = sorted(&clean);

    let min = *ordered.first()?;
    let max = *ordered.last()?;
    let q1 = percentile(&ordered, 0.25)?;
    let median = percentile(&ordered, 0.5)?;
    let q3 = percentile(&ordered, 0.75)?;

    Some(ColumnSummary {
        count: clean.len(),
        mean: avg,
        std: stddev(&clean, avg),
        min,
        max,
        median,
        five_number: FiveNumberSummary {
            min,
            q1,
            median,
            q3,
            max,
        },
    })
}

pub fn describe(dataset: &Dataset, column: ScoreColumn) -> Option<ColumnSummary> {
    summarize(&dataset.column_values(column))
}

/// Equal-width bin counts over `[min, max]`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

pub const DEFAULT_BINS: usize = 10;

pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let clean = sorted(&values.iter().copied().filter(|v| !v.is_nan()).collect::<Vec<_>>());
    if clean.is_empty() || bins == 0 {
        return None;
    }

    let mut min = clean[0];
    let mut max = clean[clean.len() - 1];
    if min == max {
        // Degenerate range: widen by half a unit on each side.
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in clean {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}
