//!
//! Documentation of the manifest errors module.
//! Every failure the derivation and service layers can surface.
//!

use thiserror::Error;

use crate::ODM::store::StoreError;

/// Why a wall-clock string could not be read
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockParseError {
    #[error("time string is empty")]
    Empty,

    #[error("expected 'h:mm AM/PM' or 'HH:MM', got '{0}'")]
    Malformed(String),

    #[error("unknown period marker '{0}'")]
    InvalidPeriod(String),

    #[error("hour '{0}' is out of range")]
    InvalidHour(String),

    #[error("minute '{0}' is out of range")]
    InvalidMinute(String),
}

/// Errors raised while turning a submission into a record
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ManifestError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} is not a valid time: {source}")]
    InvalidTime {
        field: &'static str,
        #[source]
        source: ClockParseError,
    },

    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("month {month} of {year} does not exist")]
    InvalidMonth { year: i32, month: u32 },

    /// Arithmetic produced something no valid input can produce
    #[error("derivation fault: {0}")]
    Derivation(String),
}

impl ManifestError {
    /// The camelCase input field the error points at, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ManifestError::MissingField { field }
            | ManifestError::InvalidTime { field, .. }
            | ManifestError::InvalidNumber { field, .. } => Some(field),
            ManifestError::InvalidMonth { .. } | ManifestError::Derivation(_) => None,
        }
    }
}

/// Errors of the application operations: either the input was bad or the store failed
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
