//! Action runners - one network operation each.
//!
//! A runner dispatches its pending action (where one exists), performs
//! exactly one request, and dispatches exactly one outcome action. Runners
//! never retry and never touch state except through [`Store::dispatch`].
//! The error is also returned so callers can react, but state remains the
//! primary channel.

use autorec_sync_core::Action;
use autorec_sync_types::{NameSuggestion, PlayRequest, RecordingId, RecordingWire};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::store::Store;
use crate::transport::{ApiRequest, HttpTransport};

const RECORDINGS: &str = "recordings";
const PLAY: &str = "play";
const STOP: &str = "stop";
const PLAY_STATUS: &str = "play-status";

fn recording_path(id: RecordingId) -> String {
    format!("{RECORDINGS}/{id}")
}

fn classify_path(id: RecordingId) -> String {
    format!("{RECORDINGS}/{id}/classify")
}

fn json_body<B: Serialize>(body: &B) -> Result<serde_json::Value, RequestError> {
    serde_json::to_value(body).map_err(|e| RequestError::Body(e.to_string()))
}

/// Runs API operations against the server and feeds their outcome into a store.
pub struct Actions<T: HttpTransport> {
    transport: T,
    store: Store,
}

impl<T: HttpTransport> Actions<T> {
    /// Create runners over the given transport and store.
    pub fn new(transport: T, store: Store) -> Self {
        Self { transport, store }
    }

    /// The store outcomes are dispatched into.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get the transport (for testing).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one request, turning non-2xx answers into errors.
    async fn call(&self, request: ApiRequest) -> Result<String, RequestError> {
        debug!(method = %request.method, path = %request.path, "request");
        let response = self.transport.request(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(RequestError::from_status(response.status, &response.body))
        }
    }

    /// Perform one request and decode its JSON answer.
    async fn call_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, RequestError> {
        let body = self.call(request).await?;
        serde_json::from_str(&body).map_err(|e| RequestError::Body(e.to_string()))
    }

    /// Fetch the full recording list.
    pub async fn query_recordings(&self) -> Result<(), RequestError> {
        self.store.dispatch(Action::QueryRecordingsPending);

        match self
            .call_json::<Vec<RecordingWire>>(ApiRequest::get(RECORDINGS))
            .await
        {
            Ok(list) => {
                self.store.dispatch(Action::QueryRecordingsSucceeded(list));
                Ok(())
            }
            Err(e) => {
                self.store
                    .dispatch(Action::QueryRecordingsFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Fetch what is playing. Dispatches no pending action.
    pub async fn query_play_status(&self) -> Result<(), RequestError> {
        match self
            .call_json::<Option<RecordingId>>(ApiRequest::get(PLAY_STATUS))
            .await
        {
            Ok(playing) => {
                self.store.dispatch(Action::PlayStateUpdated(playing));
                Ok(())
            }
            Err(e) => {
                self.store.dispatch(Action::PlayStateFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Ask the server to play a recording.
    ///
    /// Success dispatches nothing: the play state stays pending until the
    /// server confirms over the push stream.
    pub async fn play(&self, id: RecordingId) -> Result<(), RequestError> {
        self.store.dispatch(Action::PlayControlPending(Some(id)));

        let result = match json_body(&PlayRequest { id }) {
            Ok(body) => self.call(ApiRequest::post(PLAY, body)).await.map(drop),
            Err(e) => Err(e),
        };
        self.settle_play_control(result)
    }

    /// Ask the server to stop playback.
    ///
    /// Like [`Actions::play`], success waits for confirmation on the push stream.
    pub async fn stop(&self) -> Result<(), RequestError> {
        self.store.dispatch(Action::PlayControlPending(None));

        let result = self
            .call(ApiRequest::post(STOP, serde_json::Value::Null))
            .await
            .map(drop);
        self.settle_play_control(result)
    }

    fn settle_play_control(&self, result: Result<(), RequestError>) -> Result<(), RequestError> {
        if let Err(e) = &result {
            self.store.dispatch(Action::PlayStateFailed(e.to_string()));
        }
        result
    }

    /// Delete a recording.
    pub async fn delete(&self, id: RecordingId) -> Result<(), RequestError> {
        match self.call(ApiRequest::delete(recording_path(id))).await {
            Ok(_) => {
                self.store.dispatch(Action::RecordDelete(id));
                Ok(())
            }
            Err(e) => {
                self.store.dispatch(Action::RecordDeleteError(e.to_string()));
                Err(e)
            }
        }
    }

    /// Rename a recording.
    ///
    /// The full recording is sent with the new name, so it must be present
    /// in the current snapshot.
    pub async fn rename(&self, id: RecordingId, name: &str) -> Result<(), RequestError> {
        let result = match self.store.state().recording(id) {
            Some(recording) => {
                let mut wire = recording.to_wire();
                wire.name = name.to_string();
                match json_body(&wire) {
                    Ok(body) => {
                        self.call_json::<RecordingWire>(ApiRequest::post(recording_path(id), body))
                            .await
                    }
                    Err(e) => Err(e),
                }
            }
            None => Err(RequestError::Body(format!("no recording with id {id}"))),
        };

        match result {
            Ok(updated) => {
                self.store.dispatch(Action::RecordUpdate(updated));
                Ok(())
            }
            Err(e) => {
                self.store.dispatch(Action::RecordUpdateError(e.to_string()));
                Err(e)
            }
        }
    }

    /// Ask the server for names of similar recordings.
    ///
    /// The result goes to the caller only; state is not touched.
    pub async fn classify(&self, id: RecordingId) -> Result<Vec<NameSuggestion>, RequestError> {
        self.call_json(ApiRequest::post(classify_path(id), serde_json::Value::Null))
            .await
    }

    /// Re-query everything the push stream may have missed.
    ///
    /// Both queries run concurrently; their outcomes apply in completion
    /// order. Failures are already in state and are only logged here.
    pub async fn bootstrap(&self) {
        let (recordings, status) = tokio::join!(self.query_recordings(), self.query_play_status());
        if let Err(e) = recordings {
            warn!(error = %e, "bootstrap recordings query failed");
        }
        if let Err(e) = status {
            warn!(error = %e, "bootstrap play status query failed");
        }
    }
}
