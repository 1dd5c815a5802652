//! Core error types for Osiris.

use thiserror::Error;

/// Core error type for portal data handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field is missing from a portal payload.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A portal payload has an unexpected shape.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
