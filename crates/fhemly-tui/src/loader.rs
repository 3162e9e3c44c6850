//! Background loading: device tree and server version at start-up (and
//! after every reload), plus recovery phase changes for the status bar.

use std::sync::Arc;

use fhemly_core::HttpConsole;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::Action;

/// Fetch the tree and the version banner, forwarding each as an [`Action`].
pub async fn load_console(console: HttpConsole, action_tx: mpsc::UnboundedSender<Action>) {
    match console.load_tree().await {
        Ok(tree) => {
            info!(groups = tree.children.len(), "device tree loaded");
            let _ = action_tx.send(Action::TreeLoaded(Arc::new(tree)));
        }
        Err(e) => {
            warn!(error = %e, "failed to load device tree");
            let message = format!("Could not load the device list: {e}");
            let _ = action_tx.send(Action::LoadFailed(message));
        }
    }

    match console.server_version().await {
        Ok(version) => {
            let _ = action_tx.send(Action::VersionLoaded(version));
        }
        Err(e) => warn!(error = %e, "failed to fetch server version"),
    }
}

/// Forward every recovery phase transition until cancelled.
pub async fn watch_phase(
    console: HttpConsole,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut phase = console.subscribe_phase();
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            changed = phase.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *phase.borrow_and_update();
                debug!(?current, "recovery phase changed");
                if action_tx.send(Action::PhaseChanged(current)).is_err() {
                    break;
                }
            }
        }
    }
}
