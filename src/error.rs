//! Error types for the parameter layer

use thiserror::Error;

/// Main error type for parameter operations
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("'{kind}' has no parameter '{name}'")]
    UnknownParameter { kind: &'static str, name: String },

    #[error("'{kind}' requires parameter '{name}'")]
    MissingParameter { kind: &'static str, name: &'static str },

    #[error("Invalid value for '{kind}.{name}': {reason}")]
    InvalidParameter {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("'{kind}.{name}' is derived: expected {expected}, got {got}")]
    DerivedParameter {
        kind: &'static str,
        name: String,
        expected: String,
        got: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ParamError {
    pub(crate) fn invalid(kind: &'static str, name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            kind,
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for parameter operations
pub type ParamResult<T> = Result<T, ParamError>;
