use serde::Serialize;

use crate::model::{DocumentRecord, UploadDraft};

/// Progress of the list synchronisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// The last refresh failed. Diagnostic only; the cached list is kept.
    Failed { message: String },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The list was replaced with `count` records.
    Replaced { count: usize },
    /// The request failed; the cached list is unchanged.
    Kept,
    /// No credential was available, nothing was requested.
    NoCredential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    /// The store accepted the delete. `removed` is false when the id was
    /// already absent locally.
    Deleted { removed: bool },
    /// The request failed; local state is unchanged.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Result of the refresh that follows every successful upload.
    pub refresh: RefreshOutcome,
}

#[derive(Debug, Default)]
pub(crate) struct ManagerState {
    pub documents: Vec<DocumentRecord>,
    pub search_term: String,
    pub load: LoadState,
    pub draft: Option<UploadDraft>,
}
