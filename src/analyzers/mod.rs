//! Roster analysis: statistics, grade bands, composite ranking and grouping.
//!
//! [`analyzer::annotate`] derives categories and composite scores once per
//! load; every other module reads the resulting annotated snapshot
//! independently.

pub mod aggregate;
pub mod analyzer;
pub mod composite;
pub mod correlation;
pub mod grade;
pub mod metrics;
pub mod ranking;
pub mod search;
pub mod types;
pub mod utility;
