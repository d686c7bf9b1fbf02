//! # Error Types
//!
//! Structured error types for flash_core. Errors carry enough context for a
//! caller (human, script, or the JSON boundary) to see which field was wrong
//! and why.
//!
//! ## Example
//!
//! ```rust
//! use flash_core::errors::{FlashError, FlashResult};
//!
//! fn validate_guide_number(gn: f64) -> FlashResult<()> {
//!     if !(gn.is_finite() && gn > 0.0) {
//!         return Err(FlashError::invalid_input(
//!             "guide_number",
//!             gn.to_string(),
//!             "Guide number must be positive and finite",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_guide_number(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for flash_core operations
pub type FlashResult<T> = Result<T, FlashError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum FlashError {
    /// An input value is missing, non-positive, non-finite or malformed
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Request body could not be parsed
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// File I/O error (settings files, report output)
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Unexpected fault during computation or rendering
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FlashError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        FlashError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error for a required field that was not supplied
    pub fn missing_field(field: impl Into<String>) -> Self {
        FlashError::InvalidInput {
            field: field.into(),
            value: "missing".to_string(),
            reason: "Missing required parameter".to_string(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        FlashError::Internal {
            message: message.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        FlashError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            FlashError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the caller supplied bad data (as opposed to a fault on our side)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FlashError::InvalidInput { .. } | FlashError::SerializationError { .. }
        )
    }

    /// HTTP-style status code used at the request boundary
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FlashError::InvalidInput { .. } => "INVALID_INPUT",
            FlashError::SerializationError { .. } => "SERIALIZATION_ERROR",
            FlashError::FileError { .. } => "FILE_ERROR",
            FlashError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for FlashError {
    fn from(e: serde_json::Error) -> Self {
        FlashError::SerializationError {
            reason: e.to_string(),
        }
    }
}
