//! # sync-types
//!
//! Wire format types for the autorec recording server API.
//!
//! This crate provides the JSON shapes exchanged with the server:
//! - [`RecordingId`] - Server-assigned recording identity
//! - [`RecordingWire`] - Recording as it appears in request and response bodies
//! - [`PushMessage`], [`Envelope`] - Messages delivered over the push stream
//! - [`PlayRequest`], [`NameSuggestion`] - Request/response bodies
//! - [`WireError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod envelope;
mod error;
mod ids;
mod messages;
mod recording;

pub use envelope::{Envelope, PushMessage};
pub use error::WireError;
pub use ids::RecordingId;
pub use messages::{NameSuggestion, PlayRequest};
pub use recording::RecordingWire;
