//! Identity types for recordings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier of a recording.
///
/// Serialized as a bare JSON integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingId(pub i64);

impl RecordingId {
    /// Create a RecordingId from its integer value.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the integer value.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordingId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordingId({})", self.0)
    }
}
