//! Case-insensitive name search.

use crate::model::{AnnotatedDataset, ScoredRecord};

/// Rows whose name contains `query`, ignoring case, in original order.
///
/// The query is a literal substring. A blank query returns every row;
/// rows without a name never match a non-blank query.
pub fn filter<'a>(dataset: &'a AnnotatedDataset, query: &str) -> Vec<&'a ScoredRecord> {
    filter_rows(dataset.rows().iter(), query)
}

/// [`filter`] over any row iterator, so it can chain after other view filters.
pub fn filter_rows<'a, I>(rows: I, query: &str) -> Vec<&'a ScoredRecord>
where
    I: IntoIterator<Item = &'a ScoredRecord>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.into_iter().collect();
    }

    rows.into_iter()
        .filter(|row| {
            row.name()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// First row whose name equals `name` exactly.
pub fn find_by_name<'a>(dataset: &'a AnnotatedDataset, name: &str) -> Option<&'a ScoredRecord> {
    dataset.rows().iter().find(|row| row.name() == Some(name))
}
