//! Actions: every way the application state can change.
//!
//! The set is closed. An action kind the reducer does not handle cannot be
//! constructed, so there is no runtime "unknown action" path.

use autorec_sync_types::{PushMessage, RecordingId, RecordingWire};

/// A state change request, produced by request runners and the push stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A recordings query was issued.
    QueryRecordingsPending,
    /// A recordings query returned the full list.
    QueryRecordingsSucceeded(Vec<RecordingWire>),
    /// A recordings query failed.
    QueryRecordingsFailed(String),

    /// The server started recording.
    RecordBegin,
    /// The server finished a recording.
    RecordEnd(RecordingWire),
    /// Recording failed on the server.
    RecordError(String),

    /// A recording was deleted.
    RecordDelete(RecordingId),
    /// A delete request failed.
    RecordDeleteError(String),

    /// A recording was changed.
    RecordUpdate(RecordingWire),
    /// An update request failed.
    RecordUpdateError(String),

    /// A play (`Some`) or stop (`None`) request was issued locally.
    PlayControlPending(Option<RecordingId>),
    /// Authoritative play state: playing the given recording, or stopped.
    PlayStateUpdated(Option<RecordingId>),
    /// A play-control or play-status request failed.
    PlayStateFailed(String),
}

impl Action {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::QueryRecordingsPending => "QueryRecordingsPending",
            Self::QueryRecordingsSucceeded(_) => "QueryRecordingsSucceeded",
            Self::QueryRecordingsFailed(_) => "QueryRecordingsFailed",
            Self::RecordBegin => "RecordBegin",
            Self::RecordEnd(_) => "RecordEnd",
            Self::RecordError(_) => "RecordError",
            Self::RecordDelete(_) => "RecordDelete",
            Self::RecordDeleteError(_) => "RecordDeleteError",
            Self::RecordUpdate(_) => "RecordUpdate",
            Self::RecordUpdateError(_) => "RecordUpdateError",
            Self::PlayControlPending(_) => "PlayControlPending",
            Self::PlayStateUpdated(_) => "PlayStateUpdated",
            Self::PlayStateFailed(_) => "PlayStateFailed",
        }
    }
}

/// Push messages map one-to-one onto actions.
impl From<PushMessage> for Action {
    fn from(message: PushMessage) -> Self {
        match message {
            PushMessage::PlayBegin { recording } => Self::PlayStateUpdated(Some(recording)),
            PushMessage::PlayEnd => Self::PlayStateUpdated(None),
            PushMessage::RecordBegin => Self::RecordBegin,
            PushMessage::RecordEnd { recording } => Self::RecordEnd(recording),
            PushMessage::RecordUpdate { recording } => Self::RecordUpdate(recording),
            PushMessage::RecordDelete { recording } => Self::RecordDelete(recording),
            PushMessage::RecordError { message } => Self::RecordError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire() -> RecordingWire {
        RecordingWire {
            id: RecordingId(2),
            name: "b".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            length_seconds: 1.0,
            note_count: 1,
        }
    }

    #[test]
    fn play_messages_map_to_play_state() {
        assert_eq!(
            Action::from(PushMessage::PlayBegin {
                recording: RecordingId(9)
            }),
            Action::PlayStateUpdated(Some(RecordingId(9)))
        );
        assert_eq!(
            Action::from(PushMessage::PlayEnd),
            Action::PlayStateUpdated(None)
        );
    }

    #[test]
    fn record_messages_map_to_record_actions() {
        assert_eq!(Action::from(PushMessage::RecordBegin), Action::RecordBegin);
        assert_eq!(
            Action::from(PushMessage::RecordEnd { recording: wire() }),
            Action::RecordEnd(wire())
        );
        assert_eq!(
            Action::from(PushMessage::RecordUpdate { recording: wire() }),
            Action::RecordUpdate(wire())
        );
        assert_eq!(
            Action::from(PushMessage::RecordDelete {
                recording: RecordingId(2)
            }),
            Action::RecordDelete(RecordingId(2))
        );
        assert_eq!(
            Action::from(PushMessage::RecordError {
                message: "x".into()
            }),
            Action::RecordError("x".into())
        );
    }

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(Action::RecordBegin.kind(), "RecordBegin");
        assert_eq!(
            Action::PlayControlPending(None).kind(),
            "PlayControlPending"
        );
    }
}
