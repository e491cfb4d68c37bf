//! Entity model: recordings and the application state snapshot.

use autorec_sync_types::{RecordingId, RecordingWire};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Creation time of a recording.
///
/// The server's text is always kept, so sending a recording back reproduces
/// it exactly. Text that is not valid RFC 3339 is kept rather than rejected,
/// so a bad timestamp never hides a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// A well-formed instant and the text it was read from.
    Valid {
        /// The instant, in UTC.
        at: DateTime<Utc>,
        /// The original RFC 3339 text, offset included.
        text: String,
    },
    /// Unparseable text, passed through unchanged.
    Invalid(String),
}

impl Timestamp {
    /// Interpret server text.
    pub fn parse(text: &str) -> Self {
        match DateTime::parse_from_rfc3339(text) {
            Ok(at) => Self::Valid {
                at: at.with_timezone(&Utc),
                text: text.to_string(),
            },
            Err(_) => Self::Invalid(text.to_string()),
        }
    }

    /// The instant, if the text was well formed.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Valid { at, .. } => Some(*at),
            Self::Invalid(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Valid {
            at,
            text: at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Renders the wire form: the text the timestamp was read from.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid { text, .. } => f.write_str(text),
            Self::Invalid(text) => f.write_str(text),
        }
    }
}

/// A stored recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Server-assigned identity.
    pub id: RecordingId,
    /// Display name; empty means unnamed.
    pub name: String,
    /// When the recording was made.
    pub created_at: Timestamp,
    /// Duration in seconds.
    pub length_seconds: f64,
    /// Number of notes.
    pub note_count: u32,
}

impl Recording {
    /// Convert from the server's JSON shape.
    pub fn from_wire(wire: RecordingWire) -> Self {
        Self {
            id: wire.id,
            created_at: Timestamp::parse(&wire.created_at),
            name: wire.name,
            length_seconds: wire.length_seconds,
            note_count: wire.note_count,
        }
    }

    /// Convert back to the server's JSON shape.
    pub fn to_wire(&self) -> RecordingWire {
        RecordingWire {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at.to_string(),
            length_seconds: self.length_seconds,
            note_count: self.note_count,
        }
    }

    /// Name to show a person, falling back to the creation time.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        match &self.created_at {
            Timestamp::Valid { at, .. } => format!("Recording {}", at.format("%Y-%m-%d %H:%M")),
            Timestamp::Invalid(_) => format!("Recording #{}", self.id),
        }
    }
}

impl From<RecordingWire> for Recording {
    fn from(wire: RecordingWire) -> Self {
        Self::from_wire(wire)
    }
}

/// Play-control state as exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayingState {
    /// Nothing is playing.
    Stopped,
    /// A recording is playing.
    Playing,
    /// A play or stop request is awaiting confirmation.
    Pending,
}

/// Play-control state with the ids each phase carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Nothing is playing.
    Stopped,
    /// The given recording is playing.
    Playing(RecordingId),
    /// A local request is awaiting confirmation, or the state is not yet known.
    Pending {
        /// Recording requested to play; `None` for a stop request.
        queued: Option<RecordingId>,
        /// Recording that was playing when the request was made.
        current: Option<RecordingId>,
    },
}

impl Playback {
    /// The phase without its ids.
    pub fn state(&self) -> PlayingState {
        match self {
            Self::Stopped => PlayingState::Stopped,
            Self::Playing(_) => PlayingState::Playing,
            Self::Pending { .. } => PlayingState::Pending,
        }
    }

    /// The recording currently playing, as last confirmed.
    pub fn recording(&self) -> Option<RecordingId> {
        match self {
            Self::Stopped => None,
            Self::Playing(id) => Some(*id),
            Self::Pending { current, .. } => *current,
        }
    }

    /// The recording a pending request asked for.
    pub fn queued(&self) -> Option<RecordingId> {
        match self {
            Self::Pending { queued, .. } => *queued,
            _ => None,
        }
    }
}

/// Snapshot of everything the client knows about the server.
///
/// Replaced wholesale on every dispatch; never mutated in place by
/// collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Recordings, newest finished first for live additions.
    pub recordings: Vec<Recording>,
    /// A recordings query is outstanding.
    pub recordings_loading: bool,
    /// Most recent request failure; `None` once a later success clears it.
    pub error: Option<String>,
    /// Play-control state.
    pub playback: Playback,
    /// The server is currently recording.
    pub is_recording: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            recordings: Vec::new(),
            recordings_loading: false,
            error: None,
            playback: Playback::Pending {
                queued: None,
                current: None,
            },
            is_recording: false,
        }
    }
}

impl AppState {
    /// Initial state before anything is known.
    pub fn new() -> Self {
        Self::default()
    }

    /// Play-control phase.
    pub fn playing_state(&self) -> PlayingState {
        self.playback.state()
    }

    /// Recording currently playing.
    pub fn playing_recording(&self) -> Option<RecordingId> {
        self.playback.recording()
    }

    /// Recording a pending play request asked for.
    pub fn playing_queued(&self) -> Option<RecordingId> {
        self.playback.queued()
    }

    /// Whether an error is being shown.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Look up a recording by id.
    pub fn recording(&self, id: RecordingId) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.id == id)
    }
}
