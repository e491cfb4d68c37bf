//! Request and response bodies for the REST operations.

use serde::{Deserialize, Serialize};

use crate::RecordingId;

/// Body of `POST play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    /// Recording to start playing
    pub id: RecordingId,
}

/// A name proposed by `POST recordings/{id}/classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSuggestion {
    /// Name of an existing recording that sounds alike
    pub name: String,
    /// Similarity score, higher is closer
    pub similarity: f64,
}
