//! Configuration error types.

use std::path::Path;
use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadError {
        /// The unreadable path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration content could not be parsed.
    #[error("failed to parse {path}: {message}")]
    ParseError {
        /// The unparseable path (or `<inline>`).
        path: String,
        /// Parser detail.
        message: String,
    },

    /// A field holds an invalid value.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The dotted field path.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A cross-field validation rule failed.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Creates a file-not-found error.
    #[must_use]
    pub fn file_not_found(path: &Path) -> Self {
        Self::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Creates a read error.
    #[must_use]
    pub fn read_error(path: &Path, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
