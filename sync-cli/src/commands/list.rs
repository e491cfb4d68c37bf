//! List recordings.

use anyhow::{Context, Result};
use autorec_sync_client::{Actions, HttpTransport};
use autorec_sync_core::{AppState, Recording};

/// Run the list command.
pub async fn run<T: HttpTransport>(actions: &Actions<T>) -> Result<()> {
    actions
        .query_recordings()
        .await
        .context("Failed to fetch recordings")?;

    print!("{}", render(&actions.store().state()));
    Ok(())
}

/// Render the recording table, one line per recording.
pub fn render(state: &AppState) -> String {
    if state.recordings.is_empty() {
        return "No recordings.\n".to_string();
    }

    let mut out = String::new();
    for recording in &state.recordings {
        out.push_str(&row(recording, state.playing_recording() == Some(recording.id)));
        out.push('\n');
    }
    out
}

fn row(recording: &Recording, playing: bool) -> String {
    let marker = if playing { '>' } else { ' ' };
    format!(
        "{marker} {:>5}  {:<32}  {:>6}  {:>5} notes",
        recording.id.0,
        recording.display_name(),
        format_length(recording.length_seconds),
        recording.note_count
    )
}

/// Format a length in seconds as `m:ss`.
pub fn format_length(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
