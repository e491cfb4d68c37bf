//! Play, stop, and show play status.

use anyhow::{Context, Result};
use autorec_sync_client::{Actions, HttpTransport};
use autorec_sync_core::{AppState, Playback};
use autorec_sync_types::RecordingId;
use tracing::warn;

/// Run the status command.
pub async fn status<T: HttpTransport>(actions: &Actions<T>) -> Result<()> {
    let (status, recordings) = tokio::join!(actions.query_play_status(), actions.query_recordings());
    status.context("Failed to fetch play status")?;
    if let Err(e) = recordings {
        warn!(error = %e, "recording names unavailable");
    }

    println!("{}", describe(&actions.store().state()));
    Ok(())
}

/// Run the play command.
pub async fn play<T: HttpTransport>(actions: &Actions<T>, id: RecordingId) -> Result<()> {
    actions
        .play(id)
        .await
        .with_context(|| format!("Failed to play recording {id}"))?;

    println!("Play requested for recording {id}");
    Ok(())
}

/// Run the stop command.
pub async fn stop<T: HttpTransport>(actions: &Actions<T>) -> Result<()> {
    actions.stop().await.context("Failed to stop playback")?;

    println!("Stop requested");
    Ok(())
}

/// Describe the play state in one line.
pub fn describe(state: &AppState) -> String {
    match state.playback {
        Playback::Stopped => "Stopped".to_string(),
        Playback::Playing(id) => format!("Playing {}", label(state, id)),
        Playback::Pending {
            queued: Some(id), ..
        } => format!("Starting {}", label(state, id)),
        Playback::Pending {
            queued: None,
            current: Some(id),
        } => format!("Stopping {}", label(state, id)),
        Playback::Pending {
            queued: None,
            current: None,
        } => "Unknown".to_string(),
    }
}

fn label(state: &AppState, id: RecordingId) -> String {
    match state.recording(id) {
        Some(recording) => format!("{} (#{id})", recording.display_name()),
        None => format!("#{id}"),
    }
}
