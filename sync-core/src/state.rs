//! Push-stream connection state machine.
//!
//! This module provides a pure, side-effect-free state machine for the
//! lifecycle of the single push-stream connection. The state machine takes
//! events as input and produces a new state plus a list of actions to execute.
//!
//! The actual I/O (opening the stream, sleeping, issuing bootstrap queries)
//! is performed by sync-client, not by this module.
//!
//! Reconnection uses a fixed delay: no backoff, no jitter, no retry cap.
//! Every successful (re)connect triggers a bootstrap resync, which is the
//! only way missed push messages are recovered.

use std::time::Duration;

/// Delay between a connection failure and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Connection state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Not started.
    Disconnected,
    /// Opening the stream.
    Connecting {
        /// Consecutive failed attempts before this one.
        attempt: u32,
    },
    /// Stream open, messages flowing.
    Open,
    /// Waiting out the reconnect delay.
    Reconnecting {
        /// Consecutive failed attempts so far.
        attempt: u32,
    },
    /// Shut down for good.
    Stopped,
}

impl StreamState {
    /// Create a new state machine in the Disconnected state.
    pub fn new() -> Self {
        Self::Disconnected
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (sync-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: StreamEvent) -> (Self, Vec<StreamAction>) {
        match (self, event) {
            // Shutdown wins from anywhere but Stopped
            (Self::Stopped, _) => (Self::Stopped, vec![]),
            (_, StreamEvent::StopRequested) => (
                Self::Stopped,
                vec![StreamAction::CloseConnection, StreamAction::CancelReconnect],
            ),

            // From Disconnected
            (Self::Disconnected, StreamEvent::StartRequested) => (
                Self::Connecting { attempt: 0 },
                vec![StreamAction::OpenConnection],
            ),

            // From Connecting
            (Self::Connecting { .. }, StreamEvent::Opened) => {
                (Self::Open, vec![StreamAction::Bootstrap])
            }
            (Self::Connecting { attempt }, StreamEvent::OpenFailed) => {
                let attempt = attempt.saturating_add(1);
                (
                    Self::Reconnecting { attempt },
                    vec![StreamAction::ScheduleReconnect { attempt }],
                )
            }

            // From Open
            (Self::Open, StreamEvent::ConnectionLost) => (
                Self::Reconnecting { attempt: 1 },
                vec![
                    StreamAction::CloseConnection,
                    StreamAction::ScheduleReconnect { attempt: 1 },
                ],
            ),

            // From Reconnecting
            (Self::Reconnecting { attempt }, StreamEvent::ReconnectTimer) => (
                Self::Connecting { attempt },
                vec![StreamAction::OpenConnection],
            ),

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if the stream is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Check if currently trying to connect.
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting { .. } | Self::Reconnecting { .. })
    }

    /// Check if shut down.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that can occur in the connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// The client was started.
    StartRequested,
    /// The stream opened.
    Opened,
    /// Opening the stream failed.
    OpenFailed,
    /// An open stream errored or was ended by the server.
    ConnectionLost,
    /// The reconnect delay elapsed.
    ReconnectTimer,
    /// The client is shutting down.
    StopRequested,
}

/// Actions to be executed by the sync-client.
///
/// These are instructions, not side effects. The sync-client interprets
/// these and performs the actual I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamAction {
    /// Open a new stream, replacing any existing one.
    OpenConnection,
    /// Close the current stream, if any.
    CloseConnection,
    /// Re-query recordings and play status.
    Bootstrap,
    /// Wait the fixed delay, then deliver [`StreamEvent::ReconnectTimer`].
    ScheduleReconnect {
        /// Consecutive failed attempts, for logging.
        attempt: u32,
    },
    /// Abandon any pending reconnect.
    CancelReconnect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let state = StreamState::new();
        assert!(matches!(state, StreamState::Disconnected));
        assert!(!state.is_open());
        assert!(!state.is_connecting());
    }

    #[test]
    fn start_request_opens_connection() {
        let (state, actions) = StreamState::Disconnected.on_event(StreamEvent::StartRequested);

        assert_eq!(state, StreamState::Connecting { attempt: 0 });
        assert_eq!(actions, vec![StreamAction::OpenConnection]);
    }

    #[test]
    fn opened_triggers_bootstrap() {
        let (state, actions) = StreamState::Connecting { attempt: 0 }.on_event(StreamEvent::Opened);

        assert!(state.is_open());
        assert_eq!(actions, vec![StreamAction::Bootstrap]);
    }

    #[test]
    fn reopen_after_failures_also_bootstraps() {
        let (state, actions) = StreamState::Connecting { attempt: 4 }.on_event(StreamEvent::Opened);

        assert!(state.is_open());
        assert!(actions.contains(&StreamAction::Bootstrap));
    }

    #[test]
    fn open_failure_schedules_reconnect() {
        let (state, actions) =
            StreamState::Connecting { attempt: 0 }.on_event(StreamEvent::OpenFailed);

        assert_eq!(state, StreamState::Reconnecting { attempt: 1 });
        assert_eq!(actions, vec![StreamAction::ScheduleReconnect { attempt: 1 }]);
    }

    #[test]
    fn repeated_failures_count_up() {
        let (state, _) = StreamState::Connecting { attempt: 2 }.on_event(StreamEvent::OpenFailed);
        assert_eq!(state, StreamState::Reconnecting { attempt: 3 });
    }

    #[test]
    fn lost_connection_closes_then_schedules() {
        let (state, actions) = StreamState::Open.on_event(StreamEvent::ConnectionLost);

        assert_eq!(state, StreamState::Reconnecting { attempt: 1 });
        assert_eq!(
            actions,
            vec![
                StreamAction::CloseConnection,
                StreamAction::ScheduleReconnect { attempt: 1 },
            ]
        );
    }

    #[test]
    fn reconnect_timer_opens_again() {
        let (state, actions) =
            StreamState::Reconnecting { attempt: 2 }.on_event(StreamEvent::ReconnectTimer);

        assert_eq!(state, StreamState::Connecting { attempt: 2 });
        assert_eq!(actions, vec![StreamAction::OpenConnection]);
    }

    #[test]
    fn stop_from_any_active_state() {
        for state in [
            StreamState::Disconnected,
            StreamState::Connecting { attempt: 0 },
            StreamState::Open,
            StreamState::Reconnecting { attempt: 5 },
        ] {
            let (next, actions) = state.on_event(StreamEvent::StopRequested);
            assert!(next.is_stopped());
            assert!(actions.contains(&StreamAction::CloseConnection));
            assert!(actions.contains(&StreamAction::CancelReconnect));
        }
    }

    #[test]
    fn stopped_ignores_everything() {
        for event in [
            StreamEvent::StartRequested,
            StreamEvent::Opened,
            StreamEvent::ReconnectTimer,
            StreamEvent::StopRequested,
        ] {
            let (state, actions) = StreamState::Stopped.on_event(event);
            assert!(state.is_stopped());
            assert!(actions.is_empty());
        }
    }

    #[test]
    fn invalid_transitions_are_noops() {
        let (state, actions) = StreamState::Open.on_event(StreamEvent::StartRequested);
        assert!(state.is_open());
        assert!(actions.is_empty());

        let (state, actions) = StreamState::Disconnected.on_event(StreamEvent::ConnectionLost);
        assert_eq!(state, StreamState::Disconnected);
        assert!(actions.is_empty());
    }

    #[test]
    fn default_delay_is_one_second() {
        assert_eq!(DEFAULT_RECONNECT_DELAY, Duration::from_secs(1));
    }
}
