//! Error handling for PhotoSlicer
//!
//! Provides the error taxonomy of the coordination layer:
//! - Validation errors (operator input rejected locally)
//! - Bridge errors (backend calls that failed or never answered)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Validation error type
///
/// Raised when operator input fails a precondition. These are recovered
/// locally and never reach the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The source directory field is empty
    #[error("Please select a directory first.")]
    EmptySource,

    /// The source path does not name a directory
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The path the operator entered.
        path: PathBuf,
    },
}

impl ValidationError {
    /// Translation key used to present this error to the operator
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::EmptySource => "error.no_directory",
            ValidationError::NotADirectory { .. } => "error.not_a_directory",
        }
    }
}

/// Bridge error type
///
/// Represents failures of calls across the asynchronous backend bridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The backend did not answer within the configured timeout
    #[error("Backend call '{operation}' timed out after {timeout_ms}ms")]
    Timeout {
        /// The bridge operation name.
        operation: String,
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The backend answered with a failure
    #[error("Backend call '{operation}' failed: {reason}")]
    Failed {
        /// The bridge operation name.
        operation: String,
        /// The failure reported by the backend.
        reason: String,
    },
}

impl BridgeError {
    /// Name of the bridge operation that failed
    pub fn operation(&self) -> &str {
        match self {
            BridgeError::Timeout { operation, .. } | BridgeError::Failed { operation, .. } => {
                operation
            }
        }
    }

    /// Translation key used to present this error to the operator
    pub fn message_key(&self) -> &'static str {
        match self {
            BridgeError::Timeout { .. } => "error.bridge_timeout",
            BridgeError::Failed { .. } => "error.bridge_failed",
        }
    }
}

/// Main error type for PhotoSlicer
///
/// A unified error type that can represent any error of the core layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bridge error
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Bridge(BridgeError::Timeout { .. }))
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this is a bridge error
    pub fn is_bridge_error(&self) -> bool {
        matches!(self, Error::Bridge(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
