//! Weighted composite score, the sole ranking key.

pub const DAILY_WEIGHT: f64 = 0.6;
pub const TEST_WEIGHT: f64 = 0.4;

pub fn composite(daily: f64, test: f64) -> f64 {
    DAILY_WEIGHT * daily + TEST_WEIGHT * test
}

/// Composite of two possibly-missing scores; missing on either side yields `None`.
pub fn composite_opt(daily: Option<f64>, test: Option<f64>) -> Option<f64> {
    match (daily, test) {
        (Some(d), Some(t)) if !d.is_nan() && !t.is_nan() => Some(composite(d, t)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_composite_formula() {
        assert!((composite(90.0, 80.0) - 86.0).abs() < EPS);
        assert!((composite(0.0, 100.0) - 40.0).abs() < EPS);
        assert!((composite(100.0, 0.0) - 60.0).abs() < EPS);
    }

    #[test]
    fn test_weights_are_not_symmetric() {
        assert!((composite(90.0, 70.0) - composite(70.0, 90.0)).abs() > EPS);
        assert!((composite(75.0, 75.0) - 75.0).abs() < EPS);
    }

    #[test]
    fn test_missing_side_has_no_composite() {
        assert_eq!(composite_opt(None, Some(80.0)), None);
        assert_eq!(composite_opt(Some(80.0), None), None);
        assert_eq!(composite_opt(Some(f64::NAN), Some(80.0)), None);
        assert!(composite_opt(Some(50.0), Some(50.0)).is_some());
    }
}
