//! Delete, rename, and name suggestions.

use anyhow::{Context, Result};
use autorec_sync_client::{Actions, HttpTransport};
use autorec_sync_types::{NameSuggestion, RecordingId};

/// Run the delete command.
pub async fn delete<T: HttpTransport>(actions: &Actions<T>, id: RecordingId) -> Result<()> {
    actions
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete recording {id}"))?;

    println!("Deleted recording {id}");
    Ok(())
}

/// Run the rename command.
///
/// Renaming sends the whole recording, so the listing is fetched first.
pub async fn rename<T: HttpTransport>(actions: &Actions<T>, id: RecordingId, name: &str) -> Result<()> {
    actions
        .query_recordings()
        .await
        .context("Failed to fetch recordings")?;
    actions
        .rename(id, name)
        .await
        .with_context(|| format!("Failed to rename recording {id}"))?;

    let state = actions.store().state();
    if let Some(recording) = state.recording(id) {
        println!("Recording {id} is now \"{}\"", recording.display_name());
    }
    Ok(())
}

/// Run the suggest command.
pub async fn suggest<T: HttpTransport>(actions: &Actions<T>, id: RecordingId) -> Result<()> {
    let suggestions = actions
        .classify(id)
        .await
        .with_context(|| format!("Failed to classify recording {id}"))?;

    print!("{}", render_suggestions(&suggestions));
    Ok(())
}

/// One line per suggestion, best match first.
pub fn render_suggestions(suggestions: &[NameSuggestion]) -> String {
    if suggestions.is_empty() {
        return "No suggestions.\n".to_string();
    }

    let mut sorted: Vec<&NameSuggestion> = suggestions.iter().collect();
    sorted.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

    sorted
        .iter()
        .map(|s| format!("{:>5.1}%  {}\n", s.similarity * 100.0, s.name))
        .collect()
}
