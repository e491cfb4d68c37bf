//! Store - holds the current state snapshot and applies actions.
//!
//! Dispatch is the only way state changes. Each dispatch runs the reducer
//! atomically against the latest snapshot and publishes the result to every
//! subscriber.

use autorec_sync_core::{reduce, Action, AppState};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Shared handle to the application state.
///
/// Cloning is cheap; clones share the same state.
#[derive(Debug, Clone)]
pub struct Store {
    tx: Arc<watch::Sender<Arc<AppState>>>,
}

impl Store {
    /// Create a store holding the initial state.
    pub fn new() -> Self {
        Self::with_state(AppState::new())
    }

    /// Create a store holding the given state.
    pub fn with_state(state: AppState) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(state));
        Self { tx: Arc::new(tx) }
    }

    /// Current snapshot.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.tx.borrow())
    }

    /// Apply an action and publish the new snapshot.
    pub fn dispatch(&self, action: Action) {
        let kind = action.kind();
        self.tx.send_modify(|state| {
            *state = Arc::new(reduce(state, action));
        });
        debug!(action = kind, "dispatched");
    }

    /// Receive every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.tx.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autorec_sync_core::PlayingState;
    use autorec_sync_types::{RecordingId, RecordingWire};

    fn wire(id: i64) -> RecordingWire {
        RecordingWire {
            id: RecordingId(id),
            name: "A".into(),
            created_at: "2022-01-01T00:00:00Z".into(),
            length_seconds: 30.0,
            note_count: 100,
        }
    }

    #[test]
    fn starts_with_initial_state() {
        let store = Store::new();
        assert_eq!(*store.state(), AppState::new());
    }

    #[test]
    fn dispatch_replaces_snapshot() {
        let store = Store::new();
        let before = store.state();

        store.dispatch(Action::QueryRecordingsSucceeded(vec![wire(1)]));

        let after = store.state();
        assert!(before.recordings.is_empty());
        assert_eq!(after.recordings.len(), 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn clones_share_state() {
        let store = Store::new();
        let other = store.clone();

        other.dispatch(Action::PlayStateUpdated(Some(RecordingId(3))));
        assert_eq!(store.state().playing_state(), PlayingState::Playing);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = Store::new();
        let mut rx = store.subscribe();

        store.dispatch(Action::RecordBegin);

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_recording);
    }

    #[tokio::test]
    async fn concurrent_dispatches_are_all_applied() {
        let store = Store::new();
        let mut handles = Vec::new();
        for id in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.dispatch(Action::RecordEnd(wire(id)));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.state().recordings.len(), 20);
    }
}
