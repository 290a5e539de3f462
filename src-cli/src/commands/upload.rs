//! Upload command: drives the upload dialog from the command line.

use std::path::Path;

use serde::Serialize;

use docdesk::{DocumentType, RefreshOutcome};

use super::{ApiResponse, Render};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub title: String,
    pub document_type: DocumentType,
    /// Size of the refreshed list, when the follow-up refresh succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_count: Option<usize>,
}

impl Render for UploadResult {
    fn render(&self) -> String {
        let mut out = format!(
            "Uploaded '{}' as {}",
            self.title,
            self.document_type.label()
        );
        if let Some(count) = self.document_count {
            out.push_str(&format!("\nShowing {} documents", count));
        }
        out
    }
}

/// Opens the dialog, selects `path`, applies the optional title and type,
/// then submits. The inline dialog error becomes the response error.
pub async fn upload_document(
    state: &AppState,
    path: &Path,
    title: Option<String>,
    document_type: Option<DocumentType>,
) -> ApiResponse<UploadResult> {
    let manager = &state.manager;
    manager.open_upload();

    let result = async {
        manager.select_path(path).await?;
        if let Some(title) = title {
            manager.set_upload_title(title)?;
        }
        if let Some(document_type) = document_type {
            manager.set_upload_type(document_type)?;
        }

        let (title, document_type) = manager
            .with_draft(|d| (d.title().to_string(), d.document_type()))
            .unwrap_or_default();

        let outcome = manager.submit_upload().await?;
        let document_count = match outcome.refresh {
            RefreshOutcome::Replaced { count } => Some(count),
            _ => None,
        };

        Ok::<_, docdesk::UploadError>(UploadResult {
            title,
            document_type,
            document_count,
        })
    }
    .await;

    match result {
        Ok(uploaded) => ApiResponse::ok(uploaded),
        Err(e) => {
            let message = manager.upload_error().unwrap_or_else(|| e.to_string());
            manager.close_upload();
            ApiResponse::err(message)
        }
    }
}
