//! Error types for duration/timestamp conversion.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, DurationError>;
