//! Pearson correlation between daily and test scores.

use serde::Serialize;

use crate::model::AnnotatedDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    StrongPositive,
    Moderate,
    /// Also covers every negative coefficient.
    Weak,
}

impl Strength {
    pub fn classify(r: f64) -> Strength {
        if r > 0.7 {
            Strength::StrongPositive
        } else if r > 0.3 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::StrongPositive => "strong positive",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Correlation {
    Defined { r: f64, strength: Strength, pairs: usize },
    /// Fewer than two complete pairs, or a column without variance.
    Undefined,
}

impl Correlation {
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            Correlation::Defined { r, .. } => Some(*r),
            Correlation::Undefined => None,
        }
    }
}

/// Pearson r over pairs where both values are present.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

pub fn correlate(dataset: &AnnotatedDataset) -> Correlation {
    let pairs: Vec<(f64, f64)> = dataset
        .rows()
        .iter()
        .filter_map(|row| match (row.record.daily_score, row.record.test_score) {
            (Some(d), Some(t)) if !d.is_nan() && !t.is_nan() => Some((d, t)),
            _ => None,
        })
        .collect();

    match pearson(&pairs) {
        Some(r) => Correlation::Defined {
            r,
            strength: Strength::classify(r),
            pairs: pairs.len(),
        },
        None => Correlation::Undefined,
    }
}
