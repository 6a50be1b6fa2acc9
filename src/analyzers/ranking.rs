//! Top-N / bottom-N views ordered by composite score.

use serde::Serialize;
use std::cmp::Ordering;

use crate::model::{AnnotatedDataset, ScoredRecord};

/// A scored record with its position in the full ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub row: &'a ScoredRecord,
}

/// Rows that carry a composite score, paired with it, in insertion order.
fn rankable(dataset: &AnnotatedDataset) -> Vec<(f64, &ScoredRecord)> {
    dataset
        .rows()
        .iter()
        .filter_map(|row| row.composite_score.map(|score| (score, row)))
        .collect()
}

/// Highest composites first. Ranks run 1, 2, ...; ties keep insertion order.
pub fn top_n(dataset: &AnnotatedDataset, n: usize) -> Vec<RankedRecord<'_>> {
    let mut rows = rankable(dataset);
    // sort_by is stable
    rows.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    rows.into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (_, row))| RankedRecord { rank: i + 1, row })
        .collect()
}

/// Lowest composites first. Ranks count down from the dataset size, so the
/// lowest row of a fully scored roster is ranked `dataset.len()`.
pub fn bottom_n(dataset: &AnnotatedDataset, n: usize) -> Vec<RankedRecord<'_>> {
    let total = dataset.len();
    let mut rows = rankable(dataset);
    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    rows.into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (_, row))| RankedRecord {
            rank: total - i,
            row,
        })
        .collect()
}
