//! Closed error set for user-triggered operations.
//!
//! Every service operation surfaces one of these kinds; the presentation layer
//! turns them into a message at the boundary of the user action and nothing
//! propagates past it. Structured fields (which field, which triple, which id)
//! allow precise assertions instead of string matching.

use chrono::NaiveDate;
use shared::Session;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was missing or failed to parse.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A collection entry for this (customer, date, session) already exists.
    #[error("a {session} entry already exists for customer {customer_code} on {date}")]
    DuplicateEntry {
        customer_code: i64,
        date: NaiveDate,
        session: Session,
    },

    /// An update or delete referenced an id that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The store could not be reached or a statement failed.
    #[error("store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}

impl DomainError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StoreUnavailable {
            reason: err.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
