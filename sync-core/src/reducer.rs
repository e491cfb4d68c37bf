//! The reducer: `(state, action) → state`.
//!
//! Pure and deterministic. The input state is never modified; a new
//! snapshot is returned for every action.

use autorec_sync_types::RecordingWire;

use crate::action::Action;
use crate::model::{AppState, Playback, Recording};

/// Apply one action to a state snapshot.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();

    match action {
        // Recordings query
        Action::QueryRecordingsPending => {
            next.recordings_loading = true;
        }
        Action::QueryRecordingsSucceeded(list) => {
            next.recordings = parse_list(list);
            next.recordings_loading = false;
            next.error = None;
        }
        Action::QueryRecordingsFailed(message) => {
            next.recordings_loading = false;
            next.error = Some(message);
        }

        // Recording lifecycle
        Action::RecordBegin => {
            next.is_recording = true;
        }
        Action::RecordEnd(wire) => {
            let recording = Recording::from_wire(wire);
            next.recordings.retain(|r| r.id != recording.id);
            next.recordings.insert(0, recording);
            next.is_recording = false;
        }
        Action::RecordError(message) => {
            next.is_recording = false;
            next.error = Some(message);
        }

        // Delete
        Action::RecordDelete(id) => {
            next.recordings.retain(|r| r.id != id);
            next.error = None;
        }
        Action::RecordDeleteError(message) => {
            next.error = Some(message);
        }

        // Update
        Action::RecordUpdate(wire) => {
            let recording = Recording::from_wire(wire);
            if let Some(slot) = next.recordings.iter_mut().find(|r| r.id == recording.id) {
                *slot = recording;
            }
            next.error = None;
            next.is_recording = false;
        }
        Action::RecordUpdateError(message) => {
            next.error = Some(message);
        }

        // Play control
        Action::PlayControlPending(queued) => {
            next.playback = Playback::Pending {
                queued,
                current: state.playback.recording(),
            };
        }
        Action::PlayStateUpdated(Some(id)) => {
            next.playback = Playback::Playing(id);
        }
        Action::PlayStateUpdated(None) => {
            next.playback = Playback::Stopped;
        }
        Action::PlayStateFailed(message) => {
            next.playback = Playback::Stopped;
            next.error = Some(message);
        }
    }

    next
}

/// Convert a listing, keeping the first entry when an id repeats.
fn parse_list(list: Vec<RecordingWire>) -> Vec<Recording> {
    let mut recordings: Vec<Recording> = Vec::with_capacity(list.len());
    for wire in list {
        if recordings.iter().all(|r| r.id != wire.id) {
            recordings.push(Recording::from_wire(wire));
        }
    }
    recordings
}
