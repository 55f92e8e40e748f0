//! Input watcher background task

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::state::{AppState, InputChange};

/// Background task that tracks whether the picker holds acceptable input
///
/// Takes a receiver subscribed by the caller so no edge sent before the task
/// first runs is lost. Runs until [`AppState::shutdown`] is called.
pub async fn input_watcher_task(
    state: Arc<AppState>,
    mut input_rx: broadcast::Receiver<InputChange>,
) {
    info!("Starting input watcher task");

    let mut shutdown_rx = state.shutdown_tx.subscribe();

    loop {
        let received = tokio::select! {
            received = input_rx.recv() => received,
            _ = shutdown_rx.wait_for(|&stop| stop) => {
                debug!("Input watcher stopping");
                break;
            }
        };

        match received {
            Ok(change) => {
                let ready = change == InputChange::HasInput;
                if ready {
                    info!("Picker has input, accepting");
                } else {
                    info!("Picker has no input, blocking accept");
                }

                state.ready_tx.send_replace(ready);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Input watcher lagged, skipped {} changes", skipped);
                // Resync from the picker itself
                match state.get_view() {
                    Ok(view) => {
                        state.ready_tx.send_replace(view.has_input);
                    }
                    Err(e) => warn!("Failed to resync ready state: {}", e),
                }
            }
            Err(RecvError::Closed) => break,
        }
    }
}
