//! Envelope - the wire format of push-stream messages.
//!
//! Every message is a JSON object discriminated by its `type` field. Kinds
//! this client does not know about (the server also announces MIDI device
//! changes, for instance) decode to [`Envelope::Unrecognized`] rather than
//! an error, so newer servers keep working with older clients.

use serde::{Deserialize, Serialize};

use crate::{RecordingId, RecordingWire, WireError};

/// A state change announced by the server on its own initiative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushMessage {
    /// Playback of a recording started
    PlayBegin {
        /// The recording now playing
        recording: RecordingId,
    },
    /// Playback stopped
    PlayEnd,
    /// A new recording started
    RecordBegin,
    /// A recording finished and was stored
    RecordEnd {
        /// The stored recording
        recording: RecordingWire,
    },
    /// A recording was changed (renamed)
    RecordUpdate {
        /// The recording after the change
        recording: RecordingWire,
    },
    /// A recording was deleted
    RecordDelete {
        /// The deleted recording
        recording: RecordingId,
    },
    /// Recording failed
    RecordError {
        /// Server-provided description
        message: String,
    },
}

impl PushMessage {
    /// All `type` discriminators this client understands.
    pub const KINDS: [&'static str; 7] = [
        "PlayBegin",
        "PlayEnd",
        "RecordBegin",
        "RecordEnd",
        "RecordUpdate",
        "RecordDelete",
        "RecordError",
    ];

    /// The `type` discriminator of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayBegin { .. } => "PlayBegin",
            Self::PlayEnd => "PlayEnd",
            Self::RecordBegin => "RecordBegin",
            Self::RecordEnd { .. } => "RecordEnd",
            Self::RecordUpdate { .. } => "RecordUpdate",
            Self::RecordDelete { .. } => "RecordDelete",
            Self::RecordError { .. } => "RecordError",
        }
    }

    /// Serialize to JSON text.
    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A decoded push-stream message.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A message this client acts on.
    Known(PushMessage),
    /// A well-formed message of a kind this client ignores.
    Unrecognized {
        /// The `type` discriminator as sent
        kind: String,
    },
}

impl Envelope {
    /// Decode one message body.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON, has no string `type`, or is
    /// a known kind whose fields do not match.
    pub fn parse(text: &str) -> Result<Self, WireError> {
        let value: serde_json::Value = serde_json::from_str(text)?;

        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(WireError::MissingType)?;

        if !PushMessage::KINDS.contains(&kind) {
            return Ok(Self::Unrecognized {
                kind: kind.to_string(),
            });
        }

        Ok(Self::Known(serde_json::from_value(value)?))
    }
}
