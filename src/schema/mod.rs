//! Request parsing and response shape checks.
//!
//! Inputs deserialize into request structs and are then validated into typed
//! filters, collecting every failing field as a `path: message` string. Outputs are
//! checked against their declared invariants before they leave the service.

mod input;
mod output;

use thiserror::Error;

pub use input::{
    latest_year, MatchFilter, PlayerIdParams, PlayerListQuery, PlayerMatchParams,
    PlayerMatchQuery, TournamentIdParams, YearFilter, EARLIEST_YEAR, MAX_PAGE_SIZE,
};
pub use output::{
    validate_champion_scores, validate_h2h, validate_point_stats, validate_stat_rows,
    validate_wl_summaries,
};

/// Client input did not match the declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid request: {}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Aggregator output broke its declared shape. Always a defect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("{path}: value {value} is outside [0, 1]")]
    ValueOutOfRange { path: String, value: f64 },

    #[error("{path}: value {value} does not equal wins / (wins + losses)")]
    ValueMismatch { path: String, value: f64 },

    #[error("{path}: '{value}' is not a W-L string")]
    MalformedWl { path: String, value: String },

    #[error("{path}: {message}")]
    Shape { path: String, message: String },
}

/// Accumulates `path: message` issues for one request.
#[derive(Debug, Default)]
pub(crate) struct Issues(Vec<String>);

impl Issues {
    pub(crate) fn push(&mut self, path: impl AsRef<str>, message: impl AsRef<str>) {
        let (path, message) = (path.as_ref(), message.as_ref());
        if path.is_empty() {
            self.0.push(message.to_string());
        } else {
            self.0.push(format!("{}: {}", path, message));
        }
    }

    /// `Ok(value)` when nothing was reported.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}
