//! Push-stream client.
//!
//! Owns the single push connection, turns incoming envelopes into actions,
//! and resyncs everything on each (re)connect. Lifecycle decisions come from
//! the pure [`StreamState`] machine; this module only performs the I/O it
//! asks for.
//!
//! ```text
//! PushTransport → ConnectionManager → StreamClient → Store
//!                                         ↓
//!                          sync-core StreamState (pure)
//! ```

use autorec_sync_core::{Action, StreamAction, StreamEvent, StreamState};
use autorec_sync_types::Envelope;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::actions::Actions;
use crate::transport::{HttpTransport, PushConnection, PushTransport, TransportError};

/// Sole owner of the live push connection.
///
/// Installing a new connection always closes the previous one first, so at
/// most one is ever open.
#[derive(Default)]
pub struct ConnectionManager {
    current: Option<Box<dyn PushConnection>>,
}

impl ConnectionManager {
    /// Create a manager with no connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a connection is installed.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Install a connection, closing any existing one first.
    pub async fn replace(&mut self, connection: Box<dyn PushConnection>) {
        self.close().await;
        self.current = Some(connection);
    }

    /// Close and drop the current connection, if any.
    pub async fn close(&mut self) {
        if let Some(mut connection) = self.current.take() {
            connection.close().await;
        }
    }

    /// Read the next message from the current connection.
    pub async fn next_message(&mut self) -> Result<Option<String>, TransportError> {
        match self.current.as_mut() {
            Some(connection) => connection.next_message().await,
            None => Err(TransportError::NotConnected),
        }
    }
}

/// Keeps the store in sync with server-initiated changes.
pub struct StreamClient<T: HttpTransport, P: PushTransport> {
    actions: Arc<Actions<T>>,
    push: P,
    reconnect_delay: Duration,
}

impl<T, P> StreamClient<T, P>
where
    T: HttpTransport + 'static,
    P: PushTransport + 'static,
{
    /// Create a client that dispatches into `actions`' store.
    pub fn new(actions: Arc<Actions<T>>, push: P, reconnect_delay: Duration) -> Self {
        Self {
            actions,
            push,
            reconnect_delay,
        }
    }

    /// Run in a background task.
    pub fn spawn(self) -> StreamHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        StreamHandle {
            _guard: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }

    /// Run until `cancel` fires.
    ///
    /// Connection failures never end the loop; they are logged and retried
    /// after the fixed delay. Bootstrap queries still in flight when the loop
    /// stops are aborted, so nothing reaches the store afterwards.
    pub async fn run(self, cancel: CancellationToken) {
        let mut state = StreamState::new();
        let mut connection = ConnectionManager::new();
        let mut bootstraps = JoinSet::new();
        let mut events = VecDeque::from([StreamEvent::StartRequested]);

        info!(delay_ms = self.reconnect_delay.as_millis() as u64, "push stream client starting");

        while !state.is_stopped() {
            let event = match events.pop_front() {
                Some(event) => event,
                None if state.is_open() => match self.read(&mut connection, &cancel).await {
                    Some(event) => event,
                    None => continue,
                },
                None => {
                    cancel.cancelled().await;
                    StreamEvent::StopRequested
                }
            };

            let (next, effects) = state.on_event(event);
            state = next;

            for effect in effects {
                if let Some(event) = self
                    .execute(effect, &mut connection, &mut bootstraps, &cancel)
                    .await
                {
                    events.push_back(event);
                }
            }
        }

        connection.close().await;
        bootstraps.shutdown().await;
        info!("push stream client stopped");
    }

    /// Wait for one message; `None` means it was handled and reading continues.
    async fn read(
        &self,
        connection: &mut ConnectionManager,
        cancel: &CancellationToken,
    ) -> Option<StreamEvent> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Some(StreamEvent::StopRequested),
            message = connection.next_message() => match message {
                Ok(Some(text)) => {
                    self.handle_message(&text);
                    None
                }
                Ok(None) => {
                    info!("push stream ended by server");
                    Some(StreamEvent::ConnectionLost)
                }
                Err(e) => {
                    warn!(error = %e, "push stream failed");
                    Some(StreamEvent::ConnectionLost)
                }
            },
        }
    }

    async fn execute(
        &self,
        effect: StreamAction,
        connection: &mut ConnectionManager,
        bootstraps: &mut JoinSet<()>,
        cancel: &CancellationToken,
    ) -> Option<StreamEvent> {
        match effect {
            StreamAction::OpenConnection => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Some(StreamEvent::StopRequested),
                    opened = self.push.open() => match opened {
                        Ok(conn) => {
                            connection.replace(conn).await;
                            info!("push stream open");
                            Some(StreamEvent::Opened)
                        }
                        Err(e) => {
                            warn!(error = %e, "push stream connect failed");
                            Some(StreamEvent::OpenFailed)
                        }
                    },
                }
            }
            StreamAction::CloseConnection => {
                connection.close().await;
                None
            }
            StreamAction::Bootstrap => {
                while bootstraps.try_join_next().is_some() {}
                let actions = Arc::clone(&self.actions);
                bootstraps.spawn(async move { actions.bootstrap().await });
                None
            }
            StreamAction::ScheduleReconnect { attempt } => {
                info!(
                    attempt,
                    delay_ms = self.reconnect_delay.as_millis() as u64,
                    "reconnecting push stream"
                );
                tokio::select! {
                    _ = cancel.cancelled() => Some(StreamEvent::StopRequested),
                    _ = tokio::time::sleep(self.reconnect_delay) => Some(StreamEvent::ReconnectTimer),
                }
            }
            // The pending sleep is abandoned by its select.
            StreamAction::CancelReconnect => None,
        }
    }

    /// Dispatch one message body; anything unusable is logged and dropped.
    fn handle_message(&self, text: &str) {
        match Envelope::parse(text) {
            Ok(Envelope::Known(message)) => {
                debug!(kind = message.kind(), "push message");
                self.actions.store().dispatch(Action::from(message));
            }
            Ok(Envelope::Unrecognized { kind }) => {
                debug!(%kind, "ignoring unrecognized push message");
            }
            Err(e) => {
                warn!(error = %e, "dropping malformed push message");
            }
        }
    }
}

/// Handle to a running [`StreamClient`].
///
/// Dropping the handle stops the client as well; [`StreamHandle::shutdown`]
/// additionally waits for it to finish.
pub struct StreamHandle {
    _guard: DropGuard,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Get a clone of the cancellation token.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the client task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Close the connection, cancel any pending reconnect, and wait for exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "push stream task ended abnormally");
        }
    }
}
