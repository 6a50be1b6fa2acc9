use crate::analyzers::aggregate::aggregate_by_class;
use crate::analyzers::composite::composite_opt;
use crate::analyzers::correlation::correlate;
use crate::analyzers::grade::categorize;
use crate::analyzers::metrics::{DEFAULT_BINS, histogram, summarize};
use crate::analyzers::ranking::{bottom_n, top_n};
use crate::analyzers::search::filter_rows;
use crate::analyzers::types::{ColumnReport, RosterReport};
use crate::config::DEFAULT_TOP_N;
use crate::model::{AnnotatedDataset, Dataset, ScoreColumn, ScoredRecord};
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::debug;

/// View options chosen by the caller for one analysis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// When set, `classes` is ignored and every class is shown.
    pub show_all: bool,
    pub classes: BTreeSet<String>,
    pub search: String,
    pub top_n: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_all: true,
            classes: BTreeSet::new(),
            search: String::new(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl ViewOptions {
    fn admits_class(&self, class_label: &str) -> bool {
        self.show_all || self.classes.contains(class_label)
    }
}

/// Derives categories and composite scores for every record. Runs once per load.
pub fn annotate(dataset: &Dataset) -> AnnotatedDataset {
    let rows = dataset
        .records()
        .iter()
        .map(|record| ScoredRecord {
            daily_category: record.daily_score.map(categorize),
            test_category: record.test_score.map(categorize),
            composite_score: composite_opt(record.daily_score, record.test_score),
            record: record.clone(),
        })
        .collect();

    AnnotatedDataset::new(rows)
}

/// Rows left after the class filter and the search query, in original order.
pub fn view<'a>(dataset: &'a AnnotatedDataset, options: &ViewOptions) -> Vec<&'a ScoredRecord> {
    filter_rows(
        dataset
            .rows()
            .iter()
            .filter(|row| options.admits_class(row.class_label())),
        &options.search,
    )
}

fn column_report(dataset: &AnnotatedDataset, column: ScoreColumn) -> ColumnReport {
    let values = dataset.column_values(column);
    ColumnReport {
        summary: summarize(&values),
        histogram: histogram(&values, DEFAULT_BINS),
    }
}

/// Runs every analysis over the annotated snapshot.
///
/// Statistics, correlation, class aggregates and rankings cover the whole
/// snapshot; only `view` reflects the class filter and search query.
pub fn analyze<'a>(dataset: &'a AnnotatedDataset, options: &ViewOptions) -> RosterReport<'a> {
    let view = view(dataset, options);
    debug!(
        total = dataset.len(),
        in_view = view.len(),
        top_n = options.top_n,
        "Analyzing roster snapshot"
    );

    RosterReport {
        generated_at: Utc::now(),
        total_students: dataset.len(),
        daily: column_report(dataset, ScoreColumn::Daily),
        test: column_report(dataset, ScoreColumn::Test),
        correlation: correlate(dataset),
        classes: aggregate_by_class(dataset),
        top: top_n(dataset, options.top_n),
        bottom: bottom_n(dataset, options.top_n),
        view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::correlation::Correlation;
    use crate::analyzers::grade::Band;
    use crate::model::Record;

    fn roster() -> Dataset {
        Dataset::new(vec![
            Record::new("Ana", "X-A", 90.0, 80.0),
            Record::new("Budi", "X-A", 75.0, 75.0),
            Record::new("Cici", "X-B", 75.0, 75.0),
            Record::new("Andi", "X-B", 50.0, 35.0),
        ])
    }

    #[test]
    fn test_annotate_scenario() {
        let ds = annotate(&Dataset::new(vec![Record::new("Ana", "X-A", 90.0, 80.0)]));
        let row = &ds.rows()[0];
        assert_eq!(row.daily_category, Some(Band::A));
        assert_eq!(row.test_category, Some(Band::B));
        assert!((row.composite_score.unwrap() - 86.0).abs() < 1e-9);
    }

    #[test]
    fn test_annotate_is_idempotent_and_keeps_order() {
        let source = roster();
        let first = annotate(&source);
        let second = annotate(&source);
        assert_eq!(first, second);
        let names: Vec<_> = first.rows().iter().filter_map(|r| r.name()).collect();
        assert_eq!(names, vec!["Ana", "Budi", "Cici", "Andi"]);
    }

    #[test]
    fn test_missing_score_has_no_category() {
        let mut record = Record::new("Eka", "X-C", 0.0, 66.0);
        record.daily_score = None;
        let ds = annotate(&Dataset::new(vec![record]));
        assert_eq!(ds.rows()[0].daily_category, None);
        assert_eq!(ds.rows()[0].test_category, Some(Band::C));
        assert_eq!(ds.rows()[0].composite_score, None);
    }

    #[test]
    fn test_view_class_filter_and_search() {
        let ds = annotate(&roster());
        let options = ViewOptions {
            show_all: false,
            classes: BTreeSet::from(["X-B".to_string()]),
            search: "an".to_string(),
            ..ViewOptions::default()
        };
        let rows = view(&ds, &options);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name(), Some("Andi"));
    }

    #[test]
    fn test_show_all_ignores_class_filter() {
        let ds = annotate(&roster());
        let options = ViewOptions {
            classes: BTreeSet::from(["X-B".to_string()]),
            ..ViewOptions::default()
        };
        assert_eq!(view(&ds, &options).len(), 4);
    }

    #[test]
    fn test_analyze_report() {
        let ds = annotate(&roster());
        let options = ViewOptions {
            top_n: 2,
            ..ViewOptions::default()
        };
        let report = analyze(&ds, &options);

        assert_eq!(report.total_students, 4);
        assert_eq!(report.daily.summary.as_ref().unwrap().count, 4);
        assert_eq!(report.classes.len(), 2);
        assert_eq!(report.top.len(), 2);
        assert_eq!(report.top[0].row.name(), Some("Ana"));
        assert_eq!(report.top[1].row.name(), Some("Budi"));
        assert_eq!(report.bottom[0].row.name(), Some("Andi"));
        assert_eq!(report.bottom[0].rank, 4);
        assert!(matches!(report.correlation, Correlation::Defined { .. }));
        assert_eq!(report.view.len(), 4);
    }

    #[test]
    fn test_analyze_empty_snapshot() {
        let ds = annotate(&Dataset::default());
        let report = analyze(&ds, &ViewOptions::default());

        assert_eq!(report.total_students, 0);
        assert!(report.daily.summary.is_none());
        assert!(report.test.histogram.is_none());
        assert_eq!(report.correlation, Correlation::Undefined);
        assert!(report.classes.is_empty());
        assert!(report.top.is_empty() && report.bottom.is_empty());
    }
}
