//! Domain-level errors (no external dependencies)

use std::num::ParseIntError;
use thiserror::Error;

/// Domain errors represent malformed records and invalid queries.
/// These are independent of transport and presentation concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("record block is missing field: {0}")]
    MissingField(&'static str),

    #[error("record block has unexpected field: {0}")]
    UnexpectedField(String),

    #[error("record id is not an integer: {value:?}")]
    InvalidId {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("both domain and user cannot be empty")]
    EmptyQuery,

    #[error("invalid results selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
