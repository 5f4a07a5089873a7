//! Error types for digest-core.

use thiserror::Error;

/// Why the status/bytes portion of a line could not be read.
///
/// Raised by [`crate::tokenizer::append_fields`]; fatal to that one line only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing {field} after request field")]
    Missing { field: &'static str },
    #[error("{field} is not an integer: {value:?}")]
    NotInteger { field: &'static str, value: String },
}

/// Failures of the query layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no records to bucket")]
    NoRecords,
    #[error("bucket period must be positive, got {0}")]
    InvalidPeriod(chrono::TimeDelta),
}

/// A CIDR string that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid CIDR {value:?}: {reason}")]
pub struct CidrError {
    pub value: String,
    pub reason: String,
}
