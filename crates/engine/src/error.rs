//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidField`] thrown when setter input violates the shape of a field.
//! - [`InvalidDate`] thrown when a date is not ISO `YYYY-MM-DD` or a date
//!   range is reversed.
//! - [`LineMismatch`] thrown when a bulk line update does not key-match the
//!   return's line set. It signals an integration defect, not bad user input.
//!
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`LineMismatch`]: EngineError::LineMismatch
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Line mismatch: {0}")]
    LineMismatch(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvalidField {
                    field: a,
                    reason: ra,
                },
                Self::InvalidField {
                    field: b,
                    reason: rb,
                },
            ) => a == b && ra == rb,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::LineMismatch(a), Self::LineMismatch(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
