//! # sync-core
//!
//! Pure state logic for autorec-sync (no I/O, instant tests).
//!
//! This crate implements the client's view of the recording server:
//! the entity model, the actions that change it, the reducer that applies
//! them, and the push-stream connection state machine.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (HTTP requests, the push stream) is performed by
//! `sync-client`, which dispatches [`Action`]s into its store and interprets
//! the [`StreamAction`]s produced by [`StreamState`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod model;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use model::{AppState, Playback, PlayingState, Recording, Timestamp};
pub use reducer::reduce;
pub use state::{StreamAction, StreamEvent, StreamState, DEFAULT_RECONNECT_DELAY};
