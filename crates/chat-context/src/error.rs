//! Error types for the context engine

use thiserror::Error;

/// Errors raised by record decoding, configuration and the session store.
///
/// Every pipeline operation over well-formed data is total; these errors only
/// surface when a caller hands over malformed records or settings.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContextError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ContextError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for context engine operations
pub type Result<T> = std::result::Result<T, ContextError>;
