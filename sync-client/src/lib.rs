//! # sync-client
//!
//! Client sync core for the autorec recording server.
//!
//! Keeps one local [`AppState`](autorec_sync_core::AppState) snapshot
//! consistent with the server from two independent sources:
//! requests the client issues, and the server's push stream.
//!
//! ## Features
//!
//! - **Store**: single snapshot, replaced atomically on every dispatch
//! - **Action Runners**: one request each, outcome dispatched as an action
//! - **Push Stream**: single connection, fixed-delay reconnect, full resync
//!   on every (re)connect
//! - **Transport Abstraction**: Pluggable transport layer (reqwest, mock)
//! - **Pure State Machine**: Uses sync-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use autorec_sync_client::{ClientConfig, SyncClient};
//!
//! let client = SyncClient::from_config(&ClientConfig::default())?;
//! let stream = client.start_stream();
//!
//! client.actions().query_recordings().await?;
//! for recording in &client.store().state().recordings {
//!     println!("{}", recording.display_name());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod store;
pub mod stream;
pub mod transport;

pub use actions::Actions;
pub use client::{ClientError, SyncClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{error_message_from_body, RequestError};
pub use store::Store;
pub use stream::{ConnectionManager, StreamClient, StreamHandle};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, MockPushEvent, MockPushTransport,
    MockTransport, PushConnection, PushTransport, ReqwestPushTransport, ReqwestTransport,
    TransportError,
};
