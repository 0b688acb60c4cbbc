//! Error types for eventcal.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur in eventcal operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrenceRule(String),

    #[error("Invalid time range: {start} to {end}")]
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CalendarError {
    fn from(e: serde_json::Error) -> Self {
        CalendarError::Serialization(e.to_string())
    }
}

/// Result type alias for eventcal operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
