//! The document manager: a single controller owning the cached document
//! list, the search filter and the upload dialog.
//!
//! All mutation goes through the methods below. State sits behind a mutex
//! that is never held across an `.await`, so the manager can be shared
//! between tasks behind an `Arc`.
//!
//! Failure policy differs per operation: `refresh` and `delete` log and keep
//! the previous state, `view_content` and `submit_upload` hand the error
//! back to the caller.

pub mod auto_refresh;
pub mod confirm;
pub mod filter;
pub mod state;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use log::{debug, info, warn};
use tokio::sync::watch;
use tracing::{info_span, Instrument};

use crate::api::{DocumentApi, UploadRequest};
use crate::broadcast::{ManagerEvent, ManagerEventBroadcaster, ManagerEventKind};
use crate::config::UploadPolicy;
use crate::credentials::Credential;
use crate::error::{ApiError, DocdeskError, UploadError};
use crate::model::{DocumentRecord, DocumentType, PendingFile, UploadDraft, UploadTicket};
use crate::sanitize;
use crate::viewer::EphemeralDocument;

pub use auto_refresh::{spawn_auto_refresh, AutoRefresh};
pub use confirm::{AlwaysConfirm, ConfirmGate, NeverConfirm};
pub use filter::filter_documents;
pub use state::{DeleteOutcome, LoadState, RefreshOutcome, UploadOutcome};

use state::ManagerState;

/// Inline message when the store gives no reason for a failed upload.
pub const GENERIC_UPLOAD_FAILURE: &str = "Upload failed";

/// Prompt shown before a delete.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this document?";

pub struct DocumentManager<A> {
    api: A,
    credential: watch::Receiver<Option<Credential>>,
    upload_policy: UploadPolicy,
    events: ManagerEventBroadcaster,
    state: Mutex<ManagerState>,
}

impl<A: DocumentApi> DocumentManager<A> {
    pub fn new(
        api: A,
        credential: watch::Receiver<Option<Credential>>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            api,
            credential,
            upload_policy,
            events: ManagerEventBroadcaster::default(),
            state: Mutex::new(ManagerState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ManagerState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                warn!("Document manager lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn emit(&self, kind: ManagerEventKind) {
        self.events.send(kind);
    }

    fn current_credential(&self) -> Option<Credential> {
        self.credential.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ManagerEvent> {
        self.events.subscribe()
    }

    pub(crate) fn credential_receiver(&self) -> watch::Receiver<Option<Credential>> {
        self.credential.clone()
    }

    // ─── Document list ──────────────────────────────────────────────────────

    /// Snapshot of the cached list.
    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.state().documents.clone()
    }

    pub fn search_term(&self) -> String {
        self.state().search_term.clone()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.state().search_term = term.clone();
        self.emit(ManagerEventKind::SearchChanged { term });
    }

    /// Cached records whose titles contain the search term, ignoring case.
    /// Computed on every call.
    pub fn filtered_view(&self) -> Vec<DocumentRecord> {
        let state = self.state();
        filter_documents(&state.documents, &state.search_term)
            .cloned()
            .collect()
    }

    pub fn load_state(&self) -> LoadState {
        self.state().load.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().load.is_loading()
    }

    /// Replaces the cached list with the store's current one.
    ///
    /// Failures are logged and leave the cached list untouched. Concurrent
    /// refreshes are not reconciled: whichever response arrives last wins.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(credential) = self.current_credential() else {
            debug!("Skipping document refresh: no credential");
            return RefreshOutcome::NoCredential;
        };

        self.state().load = LoadState::Loading;
        self.emit(ManagerEventKind::LoadingChanged { loading: true });

        let result = self
            .api
            .list_documents(&credential)
            .instrument(info_span!("documents.refresh"))
            .await;

        let outcome = {
            let mut state = self.state();
            match result {
                Ok(documents) => {
                    let documents = dedupe_by_id(documents);
                    let count = documents.len();
                    state.documents = documents;
                    state.load = LoadState::Idle;
                    RefreshOutcome::Replaced { count }
                }
                Err(e) => {
                    warn!("Failed to refresh documents: {}", e);
                    state.load = LoadState::Failed {
                        message: e.to_string(),
                    };
                    RefreshOutcome::Kept
                }
            }
        };

        if let RefreshOutcome::Replaced { count } = outcome {
            info!("Loaded {} documents", count);
            self.emit(ManagerEventKind::DocumentsReplaced { count });
        }
        self.emit(ManagerEventKind::LoadingChanged { loading: false });

        outcome
    }

    /// Deletes `id` from the store after `gate` approves.
    ///
    /// There is no local existence check, so a stale id still produces a
    /// request. Failures are logged only.
    pub async fn delete(&self, id: &str, gate: &dyn ConfirmGate) -> DeleteOutcome {
        if !gate.confirm(DELETE_PROMPT) {
            debug!("Delete of document {} cancelled", id);
            return DeleteOutcome::Cancelled;
        }

        let Some(credential) = self.current_credential() else {
            warn!("Delete failed: {}", ApiError::MissingCredential);
            return DeleteOutcome::Failed;
        };

        let result = self
            .api
            .delete_document(&credential, id)
            .instrument(info_span!("documents.delete", id = %id))
            .await;

        if let Err(e) = result {
            warn!("Delete failed for document {}: {}", id, e);
            return DeleteOutcome::Failed;
        }

        let removed = {
            let mut state = self.state();
            match state.documents.iter().position(|d| d.id == id) {
                Some(index) => {
                    state.documents.remove(index);
                    true
                }
                None => false,
            }
        };

        if removed {
            info!("Deleted document {}", id);
            self.emit(ManagerEventKind::DocumentRemoved { id: id.to_string() });
        } else {
            debug!("Deleted document {} was not in the local list", id);
        }

        DeleteOutcome::Deleted { removed }
    }

    /// Fetches the content of `doc` into a temp file that disappears when
    /// the returned handle is dropped.
    pub async fn view_content(
        &self,
        doc: &DocumentRecord,
    ) -> Result<EphemeralDocument, DocdeskError> {
        let credential = self
            .current_credential()
            .ok_or(ApiError::MissingCredential)?;

        let content = self
            .api
            .fetch_content(&credential, &doc.id)
            .instrument(info_span!("documents.view", id = %doc.id))
            .await?;

        debug!(
            "Fetched {} bytes for document {}",
            content.bytes.len(),
            doc.id
        );

        EphemeralDocument::stage(doc, &content).map_err(DocdeskError::Stage)
    }

    // ─── Upload dialog ──────────────────────────────────────────────────────

    /// Opens the dialog with a fresh draft, discarding any previous one.
    pub fn open_upload(&self) {
        self.state().draft = Some(UploadDraft::new());
        self.emit(ManagerEventKind::UploadOpened);
    }

    /// Discards the draft unconditionally.
    pub fn close_upload(&self) {
        let was_open = self.state().draft.take().is_some();
        if was_open {
            self.emit(ManagerEventKind::UploadClosed);
        }
    }

    pub fn is_upload_open(&self) -> bool {
        self.state().draft.is_some()
    }

    /// Runs `f` against the open draft.
    pub fn with_draft<R>(&self, f: impl FnOnce(&UploadDraft) -> R) -> Option<R> {
        self.state().draft.as_ref().map(f)
    }

    pub fn upload_error(&self) -> Option<String> {
        self.with_draft(|d| d.error().map(str::to_string)).flatten()
    }

    pub fn is_submitting(&self) -> bool {
        self.with_draft(UploadDraft::is_submitting).unwrap_or(false)
    }

    fn update_draft<R>(&self, f: impl FnOnce(&mut UploadDraft) -> R) -> Result<R, UploadError> {
        let result = {
            let mut state = self.state();
            let draft = state.draft.as_mut().ok_or(UploadError::NoDraft)?;
            f(draft)
        };
        self.emit(ManagerEventKind::UploadChanged);
        Ok(result)
    }

    pub fn select_file(&self, file: PendingFile) -> Result<(), UploadError> {
        self.update_draft(|draft| draft.select_file(file))
    }

    /// Reads `path` and selects it.
    pub async fn select_path(&self, path: &Path) -> Result<(), UploadError> {
        debug!("Selecting {}", sanitize::redact_path(path));
        let file = PendingFile::from_path(path).await?;
        self.select_file(file)
    }

    pub fn set_upload_title(&self, title: impl Into<String>) -> Result<(), UploadError> {
        let title = title.into();
        self.update_draft(|draft| draft.set_title(title))
    }

    pub fn set_upload_type(&self, document_type: DocumentType) -> Result<(), UploadError> {
        self.update_draft(|draft| draft.set_document_type(document_type))
    }

    /// Submits the open draft.
    ///
    /// Only one submit per draft may be outstanding; a second call while the
    /// first is in flight fails with [`UploadError::AlreadyInFlight`] and
    /// sends nothing. On success the dialog closes and the list is refreshed.
    /// On failure the dialog stays open with the error recorded on the draft.
    pub async fn submit_upload(&self) -> Result<UploadOutcome, UploadError> {
        let (ticket, credential, request) = self.begin_submit()?;

        info!(
            "Uploading '{}' ({} bytes) as {}",
            request.title,
            request.file.len(),
            request.document_type
        );

        let result = self
            .api
            .upload_document(&credential, request)
            .instrument(info_span!("documents.upload", ticket = %ticket))
            .await;

        match result {
            Ok(()) => {
                let closed = {
                    let mut state = self.state();
                    if current_ticket(&state) == Some(ticket) {
                        state.draft = None;
                        true
                    } else {
                        false
                    }
                };
                if closed {
                    self.emit(ManagerEventKind::UploadClosed);
                } else {
                    debug!("Upload {} finished after its dialog was closed", ticket);
                }

                let refresh = self.refresh().await;
                Ok(UploadOutcome { refresh })
            }
            Err(e) => {
                let message = e
                    .detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_UPLOAD_FAILURE.to_string());
                warn!("Upload failed: {}", e);
                self.fail_submit(ticket, &message);
                Err(UploadError::Rejected(message))
            }
        }
    }

    /// Validates the draft and moves it to `Submitting` under a new ticket.
    fn begin_submit(&self) -> Result<(UploadTicket, Credential, UploadRequest), UploadError> {
        let credential = self.current_credential();

        let mut state = self.state();
        let draft = state.draft.as_mut().ok_or(UploadError::NoDraft)?;

        if draft.is_submitting() {
            return Err(UploadError::AlreadyInFlight);
        }

        let file = match draft.validate(&self.upload_policy).cloned() {
            Ok(file) => file,
            Err(message) => {
                draft.set_error(message.clone());
                drop(state);
                self.emit(ManagerEventKind::UploadFailed {
                    message: message.clone(),
                });
                return Err(UploadError::Validation(message));
            }
        };

        let Some(credential) = credential else {
            let message = ApiError::MissingCredential.to_string();
            draft.set_error(message.clone());
            drop(state);
            self.emit(ManagerEventKind::UploadFailed {
                message: message.clone(),
            });
            return Err(UploadError::Rejected(message));
        };

        let request = UploadRequest {
            file,
            title: draft.title().to_string(),
            document_type: draft.document_type(),
        };

        let ticket = UploadTicket::issue();
        draft.begin_submit(ticket);
        drop(state);
        self.emit(ManagerEventKind::UploadChanged);

        Ok((ticket, credential, request))
    }

    fn fail_submit(&self, ticket: UploadTicket, message: &str) {
        let applied = {
            let mut state = self.state();
            match state.draft.as_mut() {
                Some(draft) if draft.ticket() == Some(ticket) => {
                    draft.set_error(message);
                    true
                }
                _ => false,
            }
        };

        if applied {
            self.emit(ManagerEventKind::UploadFailed {
                message: message.to_string(),
            });
        } else {
            debug!("Dropping failure of upload {}: dialog was closed", ticket);
        }
    }
}

fn current_ticket(state: &ManagerState) -> Option<UploadTicket> {
    state.draft.as_ref().and_then(UploadDraft::ticket)
}

/// Keeps the first record for each id.
fn dedupe_by_id(documents: Vec<DocumentRecord>) -> Vec<DocumentRecord> {
    let mut seen = std::collections::HashSet::new();
    let before = documents.len();
    let unique: Vec<DocumentRecord> = documents
        .into_iter()
        .filter(|d| seen.insert(d.id.clone()))
        .collect();
    if unique.len() != before {
        warn!(
            "Store returned {} duplicate document id(s); keeping first occurrences",
            before - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DocumentContent;
    use crate::credentials::credential_channel;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// In-memory store with scripted failures.
    #[derive(Default)]
    struct FakeStore {
        documents: Mutex<Vec<DocumentRecord>>,
        fail_list: std::sync::atomic::AtomicBool,
        fail_delete: std::sync::atomic::AtomicBool,
        upload_detail: Mutex<Option<Option<String>>>,
        upload_gate: Option<Arc<Notify>>,
        list_calls: AtomicUsize,
        delete_calls: AtomicUsize,
        upload_calls: AtomicUsize,
    }

    impl FakeStore {
        fn with_titles(titles: &[&str]) -> Self {
            let store = Self::default();
            *store.documents.lock().unwrap() = titles
                .iter()
                .enumerate()
                .map(|(i, t)| DocumentRecord::new(format!("doc-{}", i), *t))
                .collect();
            store
        }
    }

    #[async_trait]
    impl DocumentApi for FakeStore {
        async fn list_documents(&self, _: &Credential) -> Result<Vec<DocumentRecord>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: None,
                });
            }
            Ok(self.documents.lock().unwrap().clone())
        }

        async fn delete_document(&self, _: &Credential, id: &str) -> Result<(), ApiError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: StatusCode::FORBIDDEN,
                    detail: Some("forbidden".to_string()),
                });
            }
            self.documents.lock().unwrap().retain(|d| d.id != id);
            Ok(())
        }

        async fn fetch_content(
            &self,
            _: &Credential,
            id: &str,
        ) -> Result<DocumentContent, ApiError> {
            if id == "missing" {
                return Err(ApiError::Status {
                    status: StatusCode::NOT_FOUND,
                    detail: Some("Document not found".to_string()),
                });
            }
            Ok(DocumentContent {
                bytes: b"hello".to_vec(),
                content_type: Some("text/plain".to_string()),
                file_name: Some(format!("{}.txt", id)),
            })
        }

        async fn upload_document(
            &self,
            _: &Credential,
            request: UploadRequest,
        ) -> Result<(), ApiError> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.upload_gate {
                gate.notified().await;
            }
            if let Some(detail) = self.upload_detail.lock().unwrap().clone() {
                return Err(ApiError::Status {
                    status: StatusCode::BAD_REQUEST,
                    detail,
                });
            }
            let mut docs = self.documents.lock().unwrap();
            let id = format!("doc-{}", docs.len());
            docs.push(DocumentRecord::new(id, request.title));
            Ok(())
        }
    }

    fn manager(store: FakeStore) -> DocumentManager<FakeStore> {
        let (_publisher, receiver) = credential_channel(Credential::from_token("t0k3n"));
        DocumentManager::new(store, receiver, UploadPolicy::default())
    }

    fn ids(docs: &[DocumentRecord]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_replaces_list_and_keeps_search() {
        let m = manager(FakeStore::with_titles(&["Employment Act", "Leave Policy"]));
        m.set_search_term("act");

        assert_eq!(m.refresh().await, RefreshOutcome::Replaced { count: 2 });
        assert_eq!(m.documents().len(), 2);
        assert_eq!(m.search_term(), "act");
        assert_eq!(ids(&m.filtered_view()), vec!["doc-0"]);
        assert_eq!(m.load_state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_stale_list() {
        let m = manager(FakeStore::with_titles(&["A", "B"]));
        m.refresh().await;

        m.api().fail_list.store(true, Ordering::SeqCst);
        assert_eq!(m.refresh().await, RefreshOutcome::Kept);
        assert_eq!(m.documents().len(), 2);
        assert!(!m.is_loading());
        assert!(matches!(m.load_state(), LoadState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_refresh_without_credential_does_nothing() {
        let (_publisher, receiver) = credential_channel(None);
        let m = DocumentManager::new(
            FakeStore::with_titles(&["A"]),
            receiver,
            UploadPolicy::default(),
        );
        assert_eq!(m.refresh().await, RefreshOutcome::NoCredential);
        assert_eq!(m.api().list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_drops_duplicate_ids() {
        let store = FakeStore::default();
        *store.documents.lock().unwrap() = vec![
            DocumentRecord::new("1", "First"),
            DocumentRecord::new("1", "Again"),
            DocumentRecord::new("2", "Second"),
        ];
        let m = manager(store);
        assert_eq!(m.refresh().await, RefreshOutcome::Replaced { count: 2 });
        assert_eq!(m.documents()[0].title, "First");
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one_in_order() {
        let m = manager(FakeStore::with_titles(&["A", "B", "C", "D"]));
        m.refresh().await;

        let outcome = m.delete("doc-1", &AlwaysConfirm).await;
        assert_eq!(outcome, DeleteOutcome::Deleted { removed: true });
        assert_eq!(ids(&m.documents()), vec!["doc-0", "doc-2", "doc-3"]);
    }

    #[tokio::test]
    async fn test_delete_declined_sends_nothing() {
        let m = manager(FakeStore::with_titles(&["A"]));
        m.refresh().await;

        assert_eq!(m.delete("doc-0", &NeverConfirm).await, DeleteOutcome::Cancelled);
        assert_eq!(m.api().delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(m.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_failure_is_noop_and_repeatable() {
        let m = manager(FakeStore::with_titles(&["A", "B"]));
        m.refresh().await;
        m.api().fail_delete.store(true, Ordering::SeqCst);

        assert_eq!(m.delete("doc-0", &AlwaysConfirm).await, DeleteOutcome::Failed);
        assert_eq!(m.delete("doc-0", &AlwaysConfirm).await, DeleteOutcome::Failed);
        assert_eq!(ids(&m.documents()), vec!["doc-0", "doc-1"]);
        assert_eq!(m.api().delete_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_delete_stale_id_still_calls_store() {
        let m = manager(FakeStore::with_titles(&["A"]));
        m.refresh().await;

        assert_eq!(
            m.delete("doc-0", &AlwaysConfirm).await,
            DeleteOutcome::Deleted { removed: true }
        );
        assert_eq!(
            m.delete("doc-0", &AlwaysConfirm).await,
            DeleteOutcome::Deleted { removed: false }
        );
        assert_eq!(m.api().delete_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_delete_uses_closure_gate() {
        let m = manager(FakeStore::with_titles(&["A"]));
        m.refresh().await;

        let gate = |prompt: &str| prompt == DELETE_PROMPT;
        assert_eq!(
            m.delete("doc-0", &gate).await,
            DeleteOutcome::Deleted { removed: true }
        );
    }

    #[tokio::test]
    async fn test_view_content_surfaces_errors() {
        let m = manager(FakeStore::default());
        let err = m
            .view_content(&DocumentRecord::new("missing", "Gone"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Document not found"));

        let staged = m
            .view_content(&DocumentRecord::new("doc-9", "Here"))
            .await
            .unwrap();
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_upload_operations_require_open_dialog() {
        let m = manager(FakeStore::default());
        assert_eq!(
            m.select_file(PendingFile::new("a.pdf", Vec::new())),
            Err(UploadError::NoDraft)
        );
        assert_eq!(m.submit_upload().await, Err(UploadError::NoDraft));
    }

    #[tokio::test]
    async fn test_submit_without_file_is_validation_error() {
        let m = manager(FakeStore::default());
        m.open_upload();

        let err = m.submit_upload().await.unwrap_err();
        assert_eq!(
            err,
            UploadError::Validation(crate::model::MISSING_FILE_OR_TITLE.to_string())
        );
        assert_eq!(
            m.upload_error().as_deref(),
            Some(crate::model::MISSING_FILE_OR_TITLE)
        );
        assert_eq!(m.api().upload_calls.load(Ordering::SeqCst), 0);
        assert!(m.is_upload_open());
    }

    #[tokio::test]
    async fn test_submit_unsupported_file_is_validation_error() {
        let m = manager(FakeStore::default());
        m.open_upload();
        m.select_file(PendingFile::new("notes.exe", b"MZ".to_vec()))
            .unwrap();

        let err = m.submit_upload().await.unwrap_err();
        let message = m.upload_error().unwrap();
        assert!(message.starts_with("Unsupported file type 'notes.exe'"));
        assert_eq!(err, UploadError::Validation(message));
        assert_eq!(m.api().upload_calls.load(Ordering::SeqCst), 0);
        assert!(m.is_upload_open());
    }

    #[tokio::test]
    async fn test_submit_success_closes_and_refreshes() {
        let m = manager(FakeStore::default());
        m.open_upload();
        m.select_file(PendingFile::new("policy.pdf", b"%PDF".to_vec()))
            .unwrap();

        let outcome = m.submit_upload().await.unwrap();
        assert_eq!(outcome.refresh, RefreshOutcome::Replaced { count: 1 });
        assert!(!m.is_upload_open());
        assert_eq!(m.documents()[0].title, "policy");
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_dialog_with_detail() {
        let store = FakeStore::default();
        *store.upload_detail.lock().unwrap() = Some(Some("file too large".to_string()));
        let m = manager(store);
        m.open_upload();
        m.select_file(PendingFile::new("policy.pdf", b"%PDF".to_vec()))
            .unwrap();

        let err = m.submit_upload().await.unwrap_err();
        assert_eq!(err, UploadError::Rejected("file too large".to_string()));
        assert!(m.is_upload_open());
        assert_eq!(m.upload_error().as_deref(), Some("file too large"));
        assert!(!m.is_submitting());
        assert_eq!(m.api().list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_failure_without_detail_uses_generic_message() {
        let store = FakeStore::default();
        *store.upload_detail.lock().unwrap() = Some(None);
        let m = manager(store);
        m.open_upload();
        m.select_file(PendingFile::new("policy.pdf", b"%PDF".to_vec()))
            .unwrap();

        assert!(m.submit_upload().await.is_err());
        assert_eq!(m.upload_error().as_deref(), Some(GENERIC_UPLOAD_FAILURE));
    }

    #[tokio::test]
    async fn test_resubmit_clears_previous_error() {
        let store = FakeStore::default();
        *store.upload_detail.lock().unwrap() = Some(Some("try again".to_string()));
        let m = manager(store);
        m.open_upload();
        m.select_file(PendingFile::new("policy.pdf", b"%PDF".to_vec()))
            .unwrap();
        assert!(m.submit_upload().await.is_err());

        *m.api().upload_detail.lock().unwrap() = None;
        assert!(m.submit_upload().await.is_ok());
        assert!(!m.is_upload_open());
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let store = FakeStore {
            upload_gate: Some(Arc::clone(&gate)),
            ..FakeStore::default()
        };
        let m = Arc::new(manager(store));
        m.open_upload();
        m.select_file(PendingFile::new("policy.pdf", b"%PDF".to_vec()))
            .unwrap();

        let first = tokio::spawn({
            let m = Arc::clone(&m);
            async move { m.submit_upload().await }
        });

        while !m.is_submitting() {
            tokio::task::yield_now().await;
        }

        assert_eq!(m.submit_upload().await, Err(UploadError::AlreadyInFlight));
        assert_eq!(m.upload_error(), None);

        gate.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert_eq!(m.api().upload_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_completion_after_reopen_does_not_touch_new_draft() {
        let gate = Arc::new(Notify::new());
        let store = FakeStore {
            upload_gate: Some(Arc::clone(&gate)),
            ..FakeStore::default()
        };
        *store.upload_detail.lock().unwrap() = Some(Some("rejected".to_string()));
        let m = Arc::new(manager(store));
        m.open_upload();
        m.select_file(PendingFile::new("policy.pdf", b"%PDF".to_vec()))
            .unwrap();

        let first = tokio::spawn({
            let m = Arc::clone(&m);
            async move { m.submit_upload().await }
        });
        while !m.is_submitting() {
            tokio::task::yield_now().await;
        }

        m.close_upload();
        m.open_upload();
        gate.notify_one();

        assert!(first.await.unwrap().is_err());
        assert!(m.is_upload_open());
        assert_eq!(m.upload_error(), None);
        assert_eq!(m.with_draft(|d| d.title().to_string()).as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_close_upload_discards_draft() {
        let m = manager(FakeStore::default());
        m.open_upload();
        m.set_upload_title("Draft").unwrap();
        m.set_upload_type(DocumentType::Law).unwrap();
        m.close_upload();
        assert!(!m.is_upload_open());

        m.open_upload();
        assert_eq!(
            m.with_draft(|d| (d.title().to_string(), d.document_type())),
            Some((String::new(), DocumentType::Policy))
        );
    }

    #[tokio::test]
    async fn test_events_follow_state_changes() {
        let m = manager(FakeStore::with_titles(&["A"]));
        let mut events = m.subscribe();

        m.refresh().await;
        m.set_search_term("a");

        let kinds: Vec<ManagerEventKind> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ManagerEventKind::LoadingChanged { loading: true },
                ManagerEventKind::DocumentsReplaced { count: 1 },
                ManagerEventKind::LoadingChanged { loading: false },
                ManagerEventKind::SearchChanged {
                    term: "a".to_string()
                },
            ]
        );
    }
}
