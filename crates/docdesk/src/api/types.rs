//! Wire types for the remote document store.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{DocumentType, PendingFile};

/// Binary content of one document.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentContent {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// Name suggested by `Content-Disposition`, if the store sent one.
    pub file_name: Option<String>,
}

impl std::fmt::Debug for DocumentContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentContent")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// Multipart payload for `POST {upload}`.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: PendingFile,
    pub title: String,
    pub document_type: DocumentType,
}

/// Failure body returned by the store. `detail` is usually a string but
/// request validation failures carry a list of `{loc, msg}` objects.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl ErrorBody {
    pub(crate) fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        }
    }
}

/// Extracts the server-provided message from a failure body, if any.
pub(crate) fn detail_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
}

/// Pulls `filename` out of a `Content-Disposition` header value.
pub(crate) fn file_name_from_disposition(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let (key, raw) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = raw.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
