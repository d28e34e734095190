//! Input validation helpers.
//!
//! Setters run their arguments through these before touching any state, so a
//! failed call leaves the return unchanged.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict ISO `YYYY-MM-DD` calendar date.
///
/// ```rust
/// use returns_engine::validators::parse_iso_date;
///
/// assert!(parse_iso_date("2019-04-01").is_ok());
/// assert!(parse_iso_date("2019-4-1").is_err());
/// assert!(parse_iso_date("2019-02-30").is_err());
/// ```
pub fn parse_iso_date(value: &str) -> ResultEngine<NaiveDate> {
    let invalid = || EngineError::InvalidDate(format!("expected YYYY-MM-DD, got '{value}'"));

    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|_| invalid())
}

pub fn is_iso_date(value: &str) -> bool {
    parse_iso_date(value).is_ok()
}

/// Validate an email address shape (`local@domain.tld`), returning it trimmed.
pub fn validate_email(value: &str) -> ResultEngine<String> {
    let invalid = |reason: &str| EngineError::invalid_field("email", reason);

    let email = value.trim();
    if email.is_empty() {
        return Err(invalid("email must not be empty"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("email must not contain whitespace"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("email must contain '@'"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("malformed email"));
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid("malformed email domain"));
    }
    Ok(email.to_string())
}

/// Validate a GUID (hyphenated UUID).
pub fn validate_guid(value: &str, field: &str) -> ResultEngine<Uuid> {
    let trimmed = value.trim();
    if trimmed.len() != 36 {
        return Err(EngineError::invalid_field(field, "expected a hyphenated GUID"));
    }
    Uuid::parse_str(trimmed).map_err(|_| EngineError::invalid_field(field, "invalid GUID"))
}

pub(crate) fn require_text(value: &str, field: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid_field(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_positive(value: f64, field: &str) -> ResultEngine<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::invalid_field(field, "must be a number > 0"));
    }
    Ok(value)
}

pub(crate) fn require_non_negative(value: f64, field: &str) -> ResultEngine<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::invalid_field(field, "must be a number >= 0"));
    }
    Ok(value)
}
