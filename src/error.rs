//! Error types for blocklookup.
//!
//! Incomplete data is never an error here: it is reported as a
//! [`ValidationResult`](crate::ValidationResult). The types in this module
//! cover the fail-fast cases, where the caller handed over an argument that
//! cannot be honoured.

use thiserror::Error;

/// Fail-fast errors raised by table, session and registry operations.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Property index {index} is out of range (table has {len} properties)")]
    PropertyIndexOutOfRange {
        index: usize,
        len: usize,
    },

    #[error("Unknown property kind '{value}' (expected 'Input' or 'Lookup')")]
    UnknownPropertyKind {
        value: String,
    },

    #[error("Unknown command: {name}")]
    UnknownCommand {
        name: String,
    },

    #[error("Command '{name}' is already registered")]
    DuplicateCommand {
        name: String,
    },

    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    #[error("Serialization failed: {message}")]
    Serialization {
        message: String,
    },

    #[error("Lookup table is invalid: {}", .messages.join("; "))]
    Invalid {
        messages: Vec<String>,
    },
}

impl LookupError {
    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns true if this error carries validation messages.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Returns true if this error is a caller mistake (bad index, name or kind).
    #[must_use]
    pub const fn is_argument(&self) -> bool {
        matches!(
            self,
            Self::PropertyIndexOutOfRange { .. }
                | Self::UnknownPropertyKind { .. }
                | Self::UnknownCommand { .. }
                | Self::DuplicateCommand { .. }
        )
    }
}

/// Result type alias for blocklookup operations.
pub type LookupResult<T> = Result<T, LookupError>;
