//! CLI command implementations.

pub mod list;
pub mod manage;
pub mod playback;
pub mod watch;
