//! Roster data model: raw records, the loaded dataset, and annotated rows.

use serde::Serialize;

use crate::analyzers::grade::Band;

/// One student row as read from the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: Option<String>,
    pub class_label: String,
    /// `None` when the cell was empty or not a number.
    pub daily_score: Option<f64>,
    pub test_score: Option<f64>,
}

impl Record {
    pub fn new(name: &str, class_label: &str, daily_score: f64, test_score: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            class_label: class_label.to_string(),
            daily_score: Some(daily_score),
            test_score: Some(test_score),
        }
    }

    pub fn score(&self, column: ScoreColumn) -> Option<f64> {
        match column {
            ScoreColumn::Daily => self.daily_score,
            ScoreColumn::Test => self.test_score,
        }
    }
}

/// Selector for the two numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColumn {
    Daily,
    Test,
}

impl ScoreColumn {
    pub const ALL: [ScoreColumn; 2] = [ScoreColumn::Daily, ScoreColumn::Test];
}

/// Ordered records. Insertion order is the tie-break for every sorted view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Numeric values of `column` in original order, skipping missing and NaN cells.
    pub fn column_values(&self, column: ScoreColumn) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.score(column))
            .filter(|v| !v.is_nan())
            .collect()
    }

    pub fn into_loaded(self) -> LoadedDataset {
        if self.records.is_empty() {
            LoadedDataset::Empty
        } else {
            LoadedDataset::Populated(self)
        }
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Outcome of a load: callers have to handle the empty branch explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedDataset {
    Empty,
    Populated(Dataset),
}

impl LoadedDataset {
    pub fn len(&self) -> usize {
        match self {
            LoadedDataset::Empty => 0,
            LoadedDataset::Populated(ds) => ds.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LoadedDataset::Empty)
    }

    /// The dataset, or an empty one for the `Empty` branch.
    pub fn into_dataset(self) -> Dataset {
        match self {
            LoadedDataset::Empty => Dataset::default(),
            LoadedDataset::Populated(ds) => ds,
        }
    }
}

/// A record plus the fields derived once per load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: Record,
    pub daily_category: Option<Band>,
    pub test_category: Option<Band>,
    pub composite_score: Option<f64>,
}

impl ScoredRecord {
    pub fn name(&self) -> Option<&str> {
        self.record.name.as_deref()
    }

    pub fn class_label(&self) -> &str {
        &self.record.class_label
    }
}

/// Records annotated with categories and composite scores, in original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotatedDataset {
    rows: Vec<ScoredRecord>,
}

impl AnnotatedDataset {
    pub fn new(rows: Vec<ScoredRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScoredRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_values(&self, column: ScoreColumn) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.record.score(column))
            .filter(|v| !v.is_nan())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_is_empty_branch() {
        assert_eq!(Dataset::default().into_loaded(), LoadedDataset::Empty);
        assert_eq!(LoadedDataset::Empty.len(), 0);
    }

    #[test]
    fn test_populated_branch_keeps_records() {
        let ds: Dataset = vec![Record::new("Ana", "X-A", 90.0, 80.0)].into_iter().collect();
        let loaded = ds.clone().into_loaded();
        assert!(!loaded.is_empty());
        assert_eq!(loaded.into_dataset(), ds);
    }

    #[test]
    fn test_column_values_skip_missing_and_nan() {
        let mut missing = Record::new("Budi", "X-A", 0.0, 70.0);
        missing.daily_score = None;
        let mut nan = Record::new("Cici", "X-B", 0.0, 60.0);
        nan.daily_score = Some(f64::NAN);
        let ds = Dataset::new(vec![Record::new("Ana", "X-A", 90.0, 80.0), missing, nan]);

        assert_eq!(ds.column_values(ScoreColumn::Daily), vec![90.0]);
        assert_eq!(ds.column_values(ScoreColumn::Test), vec![80.0, 70.0, 60.0]);
    }
}
