//! # autorec
//!
//! Command-line client for the autorec recording server.
//!
//! ## Commands
//!
//! - `list`: List recordings, newest first
//! - `status`: Show what the server is playing
//! - `play`: Play a recording
//! - `stop`: Stop playback
//! - `delete`: Delete a recording
//! - `rename`: Rename a recording
//! - `suggest`: Ask the server for name suggestions
//! - `watch`: Follow the push stream and print every change
//!
//! ## Example
//!
//! ```bash
//! # Point at a server and list what it has
//! autorec --base-url http://pi.local:3000 list
//!
//! # Play recording 12, then follow the stream
//! autorec play 12
//! autorec watch
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use autorec_sync_client::SyncClient;
use autorec_sync_types::RecordingId;
use commands::{list, manage, playback, watch};

/// Command-line client for the autorec recording server.
#[derive(Parser, Debug)]
#[command(name = "autorec")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to autorec.toml in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL, overrides the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List recordings, newest first
    List,

    /// Show what the server is playing
    Status,

    /// Play a recording
    Play {
        /// Recording id
        id: i64,
    },

    /// Stop playback
    Stop,

    /// Delete a recording
    Delete {
        /// Recording id
        id: i64,
    },

    /// Rename a recording
    Rename {
        /// Recording id
        id: i64,
        /// New name (empty string clears it)
        name: String,
    },

    /// Ask the server for name suggestions
    Suggest {
        /// Recording id
        id: i64,
    },

    /// Follow the push stream and print every change until Ctrl-C
    Watch,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load(cli.config.as_deref(), cli.base_url.as_deref())?;
    let client = SyncClient::from_config(&config)?;
    let actions = client.actions();

    match cli.command {
        Commands::List => list::run(actions).await?,
        Commands::Status => playback::status(actions).await?,
        Commands::Play { id } => playback::play(actions, RecordingId(id)).await?,
        Commands::Stop => playback::stop(actions).await?,
        Commands::Delete { id } => manage::delete(actions, RecordingId(id)).await?,
        Commands::Rename { id, name } => manage::rename(actions, RecordingId(id), &name).await?,
        Commands::Suggest { id } => manage::suggest(actions, RecordingId(id)).await?,
        Commands::Watch => watch::run(&client).await?,
    }

    Ok(())
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug,hyper_util=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
