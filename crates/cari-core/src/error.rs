use thiserror::Error;

use crate::checks::{CheckEvent, CheckStatus};

#[derive(Debug, Error)]
pub enum CariError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid check transition: cannot apply {event} to a check in status {from}")]
    InvalidTransition { from: CheckStatus, event: CheckEvent },

    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CariError {
    fn from(e: serde_json::Error) -> Self {
        CariError::SerializationError(e.to_string())
    }
}

impl From<chrono::ParseError> for CariError {
    fn from(e: chrono::ParseError) -> Self {
        CariError::DateError(e.to_string())
    }
}
