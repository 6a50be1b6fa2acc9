use crate::analyzers::types::ClassAggregate;
use crate::analyzers::utility::{mean, round2, stddev};
use crate::model::{AnnotatedDataset, ScoreColumn, ScoredRecord};
use std::collections::BTreeMap;

#[derive(Default)]
struct GroupSeries {
    members: usize,
    daily: Vec<f64>,
    test: Vec<f64>,
}

/// Groups rows by class label and summarizes each group.
///
/// Groups come back ordered by label. Means and sample standard deviations
/// are rounded to two decimals; a standard deviation over fewer than two
/// values stays `None`.
pub fn aggregate_by_class(dataset: &AnnotatedDataset) -> Vec<ClassAggregate> {
    aggregate_by(dataset, |row| row.class_label())
}

/// Same as [`aggregate_by_class`] with a caller-supplied partition key.
pub fn aggregate_by<'a, F>(dataset: &'a AnnotatedDataset, key: F) -> Vec<ClassAggregate>
where
    F: Fn(&'a ScoredRecord) -> &'a str,
{
    let mut groups: BTreeMap<&str, GroupSeries> = BTreeMap::new();

    for row in dataset.rows() {
        let group = groups.entry(key(row)).or_default();
        group.members += 1;

        macro_rules! push_score {
            ($series:ident, $column:expr) => {
                if let Some(v) = row.record.score($column).filter(|v| !v.is_nan()) {
                    group.$series.push(v);
                }
            };
        }

        push_score!(daily, ScoreColumn::Daily);
        push_score!(test, ScoreColumn::Test);
    }

    groups
        .into_iter()
        .map(|(label, series)| {
            let (daily_mean, daily_std) = mean_and_std(&series.daily);
            let (test_mean, test_std) = mean_and_std(&series.test);
            ClassAggregate {
                class_label: label.to_string(),
                members: series.members,
                daily_count: series.daily.len(),
                daily_mean,
                daily_std,
                test_mean,
                test_std,
            }
        })
        .collect()
}

fn mean_and_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    match mean(values) {
        Some(avg) => (Some(round2(avg)), stddev(values, avg).map(round2)),
        None => (None, None),
    }
}
