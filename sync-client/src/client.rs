//! SyncClient - the main interface for autorec-sync.
//!
//! This module provides [`SyncClient`], which wires a [`Store`], the
//! [`Actions`] runners and the push-stream [`StreamClient`] together over a
//! pair of transports.
//!
//! # Architecture
//!
//! ```text
//! Application → Actions ──→ HttpTransport ──→ Server
//!      ↑           ↓                            │
//!      └──────── Store ←── StreamClient ←── PushTransport
//!                  ↓
//!          sync-core (pure reducer)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use autorec_sync_client::{ClientConfig, SyncClient};
//!
//! let client = SyncClient::from_config(&ClientConfig::default())?;
//! let stream = client.start_stream();
//!
//! client.actions().play(RecordingId(3)).await?;
//! let state = client.store().state();
//!
//! stream.shutdown().await;
//! ```

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::actions::Actions;
use crate::config::{ClientConfig, ConfigError};
use crate::store::Store;
use crate::stream::{StreamClient, StreamHandle};
use crate::transport::{
    HttpTransport, PushTransport, ReqwestPushTransport, ReqwestTransport, TransportError,
};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// A complete client: state, request runners, and push-stream sync.
pub struct SyncClient<T: HttpTransport, P: PushTransport> {
    actions: Arc<Actions<T>>,
    push: P,
    reconnect_delay: Duration,
}

impl SyncClient<ReqwestTransport, ReqwestPushTransport> {
    /// Create a client talking HTTP to the configured server.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url()?;
        let http = ReqwestTransport::new(base_url.clone(), config.request_timeout())?;
        let push = ReqwestPushTransport::new(&base_url, &config.stream_path, config.request_timeout())?;
        Ok(Self::new(http, push, config.reconnect_delay()))
    }
}

impl<T, P> SyncClient<T, P>
where
    T: HttpTransport + 'static,
    P: PushTransport + Clone + 'static,
{
    /// Create a client over the given transports with a fresh store.
    pub fn new(http: T, push: P, reconnect_delay: Duration) -> Self {
        Self {
            actions: Arc::new(Actions::new(http, Store::new())),
            push,
            reconnect_delay,
        }
    }

    /// The state store.
    pub fn store(&self) -> &Store {
        self.actions.store()
    }

    /// The request runners.
    pub fn actions(&self) -> &Actions<T> {
        &self.actions
    }

    /// Start keeping the store in sync with the push stream.
    ///
    /// Each call starts an independent stream client; callers hold one
    /// handle per session.
    pub fn start_stream(&self) -> StreamHandle {
        StreamClient::new(
            Arc::clone(&self.actions),
            self.push.clone(),
            self.reconnect_delay,
        )
        .spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Method, MockPushEvent, MockPushTransport, MockTransport};
    use autorec_sync_types::RecordingId;

    fn test_client() -> (SyncClient<MockTransport, MockPushTransport>, MockTransport, MockPushTransport) {
        let http = MockTransport::new();
        let push = MockPushTransport::new();
        let client = SyncClient::new(http.clone(), push.clone(), Duration::from_millis(1000));
        (client, http, push)
    }

    // ===========================================
    // Construction Tests
    // ===========================================

    #[test]
    fn from_config_builds_reqwest_client() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9/api");
        assert!(SyncClient::from_config(&config).is_ok());
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let config = ClientConfig::default().with_base_url("::nope::");
        assert!(matches!(
            SyncClient::from_config(&config),
            Err(ClientError::Config(_))
        ));
    }

    // ===========================================
    // Wiring Tests
    // ===========================================

    #[tokio::test]
    async fn actions_dispatch_into_client_store() {
        let (client, http, _push) = test_client();
        http.respond(Method::Get, "play-status", 200, "2");

        client.actions().query_play_status().await.unwrap();

        assert_eq!(
            client.store().state().playing_recording(),
            Some(RecordingId(2))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stream_feeds_client_store() {
        let (client, http, push) = test_client();
        http.respond(Method::Get, "recordings", 200, "[]");
        http.respond(Method::Get, "play-status", 200, "null");
        push.queue_connection(vec![MockPushEvent::message(r#"{"type":"RecordBegin"}"#)]);

        let handle = client.start_stream();
        let mut rx = client.store().subscribe();
        rx.wait_for(|s| s.is_recording).await.unwrap();

        handle.shutdown().await;
        assert_eq!(push.active(), 0);
    }
}
