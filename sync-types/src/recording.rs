//! Recording as carried in request and response bodies.

use serde::{Deserialize, Deserializer, Serialize};

use crate::RecordingId;

/// A recording in the server's JSON shape.
///
/// `created_at` stays as text here; interpretation happens in sync-core.
/// Listing responses only guarantee `id`, `name` and `created_at`, so the
/// remaining fields fall back to zero when absent or null. A negative note
/// count reads as zero rather than rejecting the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingWire {
    /// Server-assigned identity
    pub id: RecordingId,
    /// Display name (empty when the recording was never named)
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Creation time, RFC 3339 text
    pub created_at: String,
    /// Duration in seconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub length_seconds: f64,
    /// Number of notes in the recording
    #[serde(default, deserialize_with = "lenient_count")]
    pub note_count: u32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(count.clamp(0.0, u32::MAX as f64) as u32)
}
