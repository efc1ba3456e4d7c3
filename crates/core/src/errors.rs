//! Core error types for the Sitefolio engine.
//!
//! This module defines storage-agnostic error types. A record store
//! implementation converts its own failures into these types before they reach
//! the engine.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
///
/// Data-quality problems are not errors: they are reported as warnings on the
/// computed snapshot. Undefined performance indices are not errors either.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Record store error: {0}")]
    Repository(String),

    /// A total or ratio does not fit in a `Decimal`.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

impl Error {
    /// True when the error means the requested project does not exist.
    pub fn is_unknown_project(&self) -> bool {
        matches!(
            self,
            Error::Configuration(ConfigurationError::UnknownProject(_))
        )
    }
}

/// Fatal configuration problems. Surfaced immediately and never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Budget at completion for project '{project_id}' must be positive, got {bac}")]
    NonPositiveBudget { project_id: String, bac: Decimal },

    #[error("Unknown project '{0}'")]
    UnknownProject(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// Validation errors raised at the record boundary, before rows reach the engine.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Negative {field} ({value}) for project '{project_id}' on {date}")]
    NegativeCost {
        project_id: String,
        date: NaiveDate,
        field: &'static str,
        value: Decimal,
    },

    #[error("Percent complete {value} for project '{project_id}' on {date} is outside 0-100")]
    PercentOutOfRange {
        project_id: String,
        date: NaiveDate,
        value: Decimal,
    },

    #[error("Record for project '{found}' passed with records of project '{expected}'")]
    ProjectMismatch { expected: String, found: String },

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
