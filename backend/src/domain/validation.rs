//! Form-field validation shared by the services.
//!
//! A parse failure here is a `Validation` error surfaced to the caller; it
//! never reaches the store.

use chrono::NaiveDate;

use crate::error::{DomainError, DomainResult};

/// Parse a numeric form field that must be a non-negative number.
pub fn parse_non_negative(field: &'static str, raw: &str) -> DomainResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(field, format!("'{}' is not a number", raw.trim())))?;

    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(field, "must be non-negative"));
    }
    Ok(value)
}

/// Parse a date form field in `YYYY-MM-DD` format.
pub fn parse_date(field: &'static str, raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation(field, format!("'{}' is not a YYYY-MM-DD date", raw.trim())))
}

/// Trim a required text field, rejecting empty input.
pub fn require_non_empty(field: &'static str, raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}
