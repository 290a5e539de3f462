//! State change notifications for front-ends.
//!
//! The manager publishes a [`ManagerEvent`] after every mutation so a
//! front-end can re-read the filtered view. Sending never blocks and having
//! no subscribers is fine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ManagerEventKind {
    LoadingChanged { loading: bool },
    DocumentsReplaced { count: usize },
    DocumentRemoved { id: String },
    SearchChanged { term: String },
    UploadOpened,
    UploadChanged,
    UploadFailed { message: String },
    UploadClosed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: ManagerEventKind,
}

impl ManagerEvent {
    pub fn new(kind: ManagerEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }
}

#[derive(Clone)]
pub struct ManagerEventBroadcaster {
    sender: broadcast::Sender<ManagerEvent>,
}

impl ManagerEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, kind: ManagerEventKind) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(ManagerEvent::new(kind));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ManagerEvent> {
        self.sender.subscribe()
    }
}

impl Default for ManagerEventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}
