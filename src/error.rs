//! Error type for loading and exporting rosters.

use thiserror::Error;

/// Structural failures surfaced to the caller.
///
/// Data-quality problems (a non-numeric cell, a group too small for a
/// standard deviation) are not errors; they show up as `None` in results.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster is missing expected column '{column}'")]
    MissingColumn { column: String },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RosterError {
    /// Structural errors are the ones a load must never swallow.
    pub fn is_structural(&self) -> bool {
        matches!(self, RosterError::MissingColumn { .. } | RosterError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
