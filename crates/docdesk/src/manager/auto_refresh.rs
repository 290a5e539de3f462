//! Refreshes the document list whenever a credential becomes available.
//!
//! Runs once for the value present at start, then again each time the
//! credential channel changes to `Some`. Clearing the credential does not
//! trigger a refresh and does not empty the cached list.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::api::DocumentApi;

use super::DocumentManager;

/// Handle to a running auto-refresh task.
pub struct AutoRefresh {
    handle: JoinHandle<()>,
    shutdown: Arc<Notify>,
}

impl AutoRefresh {
    /// Signals the task to stop and waits for it.
    pub async fn stop(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.handle.await {
            log::warn!("Auto-refresh task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Starts the auto-refresh loop on the current runtime.
///
/// The loop exits when [`AutoRefresh::stop`] is called or every credential
/// publisher has been dropped.
pub fn spawn_auto_refresh<A>(manager: Arc<DocumentManager<A>>) -> AutoRefresh
where
    A: DocumentApi + 'static,
{
    let shutdown = Arc::new(Notify::new());
    let stop = Arc::clone(&shutdown);
    let mut credential = manager.credential_receiver();

    let handle = tokio::spawn(async move {
        let mut present = credential.borrow_and_update().is_some();

        loop {
            if present {
                manager.refresh().await;
            }

            tokio::select! {
                _ = stop.notified() => {
                    log::debug!("Auto-refresh stopped");
                    break;
                }
                changed = credential.changed() => {
                    if changed.is_err() {
                        log::debug!("Credential channel closed, auto-refresh exiting");
                        break;
                    }
                    present = credential.borrow_and_update().is_some();
                    if present {
                        log::info!("Credential changed, refreshing documents");
                    }
                }
            }
        }
    });

    AutoRefresh { handle, shutdown }
}
