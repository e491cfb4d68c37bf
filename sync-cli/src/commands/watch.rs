//! Follow the push stream.

use anyhow::Result;
use autorec_sync_client::{HttpTransport, PushTransport, SyncClient};
use autorec_sync_core::AppState;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use super::playback::describe;

/// Run the watch command until Ctrl-C.
pub async fn run<T, P>(client: &SyncClient<T, P>) -> Result<()>
where
    T: HttpTransport + 'static,
    P: PushTransport + Clone + 'static,
{
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            info!(error = %e, "no Ctrl-C handler; watching until killed");
            std::future::pending::<()>().await;
        }
    };
    follow(client, shutdown, &mut std::io::stdout()).await
}

/// Print one line per observed change until `shutdown` resolves.
pub async fn follow<T, P, F, W>(client: &SyncClient<T, P>, shutdown: F, out: &mut W) -> Result<()>
where
    T: HttpTransport + 'static,
    P: PushTransport + Clone + 'static,
    F: Future<Output = ()>,
    W: Write,
{
    let mut rx = client.store().subscribe();
    let mut seen: Arc<AppState> = rx.borrow_and_update().clone();
    let stream = client.start_stream();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => break Ok(()),
            changed = rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let next = rx.borrow_and_update().clone();
                if let Err(e) = print_changes(out, &seen, &next) {
                    break Err(e);
                }
                seen = next;
            }
        }
    };

    stream.shutdown().await;
    Ok(result?)
}

fn print_changes<W: Write>(out: &mut W, before: &AppState, after: &AppState) -> std::io::Result<()> {
    for line in changes(before, after) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Describe what differs between two snapshots.
pub fn changes(before: &AppState, after: &AppState) -> Vec<String> {
    let mut lines = Vec::new();

    if before.is_recording != after.is_recording {
        lines.push(if after.is_recording {
            "Recording started".to_string()
        } else {
            "Recording finished".to_string()
        });
    }
    if before.recordings != after.recordings && !after.recordings_loading {
        lines.push(format!("{} recordings", after.recordings.len()));
    }
    if before.playback != after.playback {
        lines.push(describe(after));
    }
    if before.error != after.error {
        if let Some(error) = &after.error {
            lines.push(format!("Error: {error}"));
        }
    }

    lines
}
