//! Error types for wire decoding.

use thiserror::Error;

/// Errors that can occur while decoding server messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// Message text is not valid JSON or does not match the expected shape
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// Push message has no string `type` discriminator
    #[error("message has no type field")]
    MissingType,
}
