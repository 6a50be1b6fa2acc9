//! Runtime configuration for the roster pipeline.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "source": "https://example.org/roster.csv",
//!   "columns": { "name": "nama siswa", "class_label": "kelas" },
//!   "cache_ttl_secs": 300,
//!   "refresh_secs": 300,
//!   "top_n": 10
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, RosterError};

/// Environment variable that overrides [`RosterConfig::source`].
pub const SOURCE_ENV: &str = "ROSTER_SOURCE";

/// Default number of rows in the top / bottom ranking views.
pub const DEFAULT_TOP_N: usize = 10;

/// Header names of the four input columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub class_label: String,
    pub daily_score: String,
    pub test_score: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "nama siswa".to_string(),
            class_label: "kelas".to_string(),
            daily_score: "nilai harian".to_string(),
            test_score: "nilai tes".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// URL or local path of the roster CSV.
    pub source: Option<String>,
    pub columns: ColumnNames,
    pub cache_ttl_secs: u64,
    pub refresh_secs: u64,
    pub top_n: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            source: None,
            columns: ColumnNames::default(),
            cache_ttl_secs: 300,
            refresh_secs: 300,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl RosterConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: RosterConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces `source` with `ROSTER_SOURCE` when that variable is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(source) = std::env::var(SOURCE_ENV) {
            if !source.trim().is_empty() {
                self.source = Some(source);
            }
        }
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.refresh_secs == 0 {
            return Err(RosterError::Config("refresh_secs must be greater than 0".into()));
        }
        let cols = &self.columns;
        let names = [&cols.name, &cols.class_label, &cols.daily_score, &cols.test_score];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(RosterError::Config("column names must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = RosterConfig::from_json("{}").unwrap();
        assert_eq!(config, RosterConfig::default());
        assert_eq!(config.columns.daily_score, "nilai harian");
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_partial_columns_keep_other_defaults() {
        let config = RosterConfig::from_json(r#"{"columns": {"name": "student"}}"#).unwrap();
        assert_eq!(config.columns.name, "student");
        assert_eq!(config.columns.class_label, "kelas");
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let err = RosterConfig::from_json(r#"{"refresh_secs": 0}"#).unwrap_err();
        assert!(matches!(err, RosterError::Config(_)));
    }

    #[test]
    fn test_blank_column_rejected() {
        let err = RosterConfig::from_json(r#"{"columns": {"test_score": " "}}"#).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_durations() {
        let config = RosterConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.refresh_period(), Duration::from_secs(300));
    }
}
