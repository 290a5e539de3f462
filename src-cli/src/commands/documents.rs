//! Document list, view and delete commands.

use std::path::PathBuf;

use serde::Serialize;

use docdesk::{AlwaysConfirm, ConfirmGate, DeleteOutcome, DocumentRecord, DocumentStatus};

use super::{ApiResponse, Render};
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub category: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<u64>,
}

impl From<&DocumentRecord> for DocumentRow {
    fn from(doc: &DocumentRecord) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            doc_type: doc.doc_type().to_string(),
            category: doc.category().to_string(),
            status: doc.status(),
            chunks: doc.indexed_chunks(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTable {
    pub search: String,
    pub loading: bool,
    pub documents: Vec<DocumentRow>,
}

impl Render for DocumentTable {
    fn render(&self) -> String {
        if self.loading {
            return "Loading documents...".to_string();
        }
        if self.documents.is_empty() {
            return "No documents found.".to_string();
        }

        let title_width = self
            .documents
            .iter()
            .map(|d| d.title.chars().count())
            .max()
            .unwrap_or(0)
            .max("TITLE".len());

        let mut out = format!(
            "{:<title_width$}  {:<10}  {:<12}  {:<10}  {}\n",
            "TITLE", "TYPE", "CATEGORY", "STATUS", "CHUNKS"
        );
        for row in &self.documents {
            let chunks = row
                .chunks
                .map(|c| format!("{} chunks", c))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{:<title_width$}  {:<10}  {:<12}  {:<10}  {}\n",
                row.title, row.doc_type, row.category, row.status, chunks
            ));
        }
        out.push_str(&format!("\nShowing {} documents", self.documents.len()));
        out
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResult {
    pub id: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub kept: bool,
}

impl Render for ViewResult {
    fn render(&self) -> String {
        if self.kept {
            format!("Saved document {} to {}", self.id, self.path)
        } else {
            format!("Document {} staged at {} (removed on exit)", self.id, self.path)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub id: String,
    pub outcome: &'static str,
}

impl Render for DeleteResult {
    fn render(&self) -> String {
        match self.outcome {
            "deleted" => format!("Deleted document {}", self.id),
            "cancelled" => "Delete cancelled".to_string(),
            _ => format!("Document {} unchanged", self.id),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Refreshes and returns the filtered table.
pub async fn list_documents(state: &AppState, search: Option<&str>) -> ApiResponse<DocumentTable> {
    let manager = &state.manager;
    if let Some(term) = search {
        manager.set_search_term(term);
    }

    manager.refresh().await;

    let documents = manager.filtered_view().iter().map(DocumentRow::from).collect();
    ApiResponse::ok(DocumentTable {
        search: manager.search_term(),
        loading: manager.is_loading(),
        documents,
    })
}

/// Fetches one document's content into a temp file.
///
/// The record is looked up in a fresh listing so the staged file can be
/// named after it; unknown ids are still fetched.
pub async fn view_document(
    state: &AppState,
    id: &str,
    keep: Option<PathBuf>,
) -> (ApiResponse<ViewResult>, Option<docdesk::EphemeralDocument>) {
    let manager = &state.manager;
    manager.refresh().await;

    let record = manager
        .documents()
        .into_iter()
        .find(|d| d.id == id)
        .unwrap_or_else(|| DocumentRecord::new(id, id));

    let staged = match manager.view_content(&record).await {
        Ok(staged) => staged,
        Err(e) => return (ApiResponse::err(e.to_string()), None),
    };

    let content_type = staged.content_type().map(str::to_string);

    if let Some(destination) = keep {
        let destination = if destination.is_dir() {
            match staged.path().file_name() {
                Some(name) => destination.join(name),
                None => destination,
            }
        } else {
            destination
        };
        return match staged.save_copy(&destination) {
            Ok(saved) => (
                ApiResponse::ok(ViewResult {
                    id: id.to_string(),
                    path: saved.display().to_string(),
                    content_type,
                    kept: true,
                }),
                None,
            ),
            Err(e) => (
                ApiResponse::err(format!("Failed to save {}: {}", destination.display(), e)),
                None,
            ),
        };
    }

    let response = ApiResponse::ok(ViewResult {
        id: id.to_string(),
        path: staged.path().display().to_string(),
        content_type,
        kept: false,
    });
    (response, Some(staged))
}

/// Deletes a document after an interactive confirmation, unless `yes`.
///
/// A failed delete is only logged, so the command still succeeds.
pub async fn delete_document(state: &AppState, id: &str, yes: bool) -> ApiResponse<DeleteResult> {
    let prompt = |message: &str| {
        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                log::warn!("Confirmation prompt failed: {}", e);
                false
            })
    };

    let gate: &dyn ConfirmGate = if yes { &AlwaysConfirm } else { &prompt };
    let outcome = match state.manager.delete(id, gate).await {
        DeleteOutcome::Deleted { .. } => "deleted",
        DeleteOutcome::Cancelled => "cancelled",
        DeleteOutcome::Failed => "unchanged",
    };

    ApiResponse::ok(DeleteResult {
        id: id.to_string(),
        outcome,
    })
}
