//! Error types for Veil.
//!
//! Errors are organized by concern. Per-image failures from the engines are
//! reported as [`SanitizeError`] so callers can tell a file that would not
//! decode from one that would not encode, or from a bad parameter.

use thiserror::Error;

/// Top-level error type for Veil operations.
#[derive(Error, Debug)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-image sanitization errors
    #[error("Sanitize error: {0}")]
    Sanitize(#[from] SanitizeError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Coarse classification of a [`SanitizeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Encode,
    Validation,
}

/// Failures raised at the boundary of the metadata and redaction engines.
#[derive(Error, Debug)]
pub enum SanitizeError {
    /// The source bytes could not be parsed into a pixel buffer
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The output could not be produced in the requested format
    #[error("Encode error ({format}): {message}")]
    Encode { format: String, message: String },

    /// A caller-supplied parameter was rejected
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SanitizeError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub(crate) fn encode(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Encode { .. } => ErrorKind::Encode,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Convenience type alias for Veil results.
pub type Result<T> = std::result::Result<T, VeilError>;

/// Convenience type alias for engine results.
pub type SanitizeResult<T> = std::result::Result<T, SanitizeError>;
