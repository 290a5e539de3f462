//! Short-lived local copies of fetched document content.
//!
//! Content is written to a temporary file that is removed when the
//! [`EphemeralDocument`] is dropped. Nothing is cached between views.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::api::DocumentContent;
use crate::model::DocumentRecord;

pub struct EphemeralDocument {
    file: NamedTempFile,
    content_type: Option<String>,
}

impl std::fmt::Debug for EphemeralDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralDocument")
            .field("path", &self.file.path())
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl EphemeralDocument {
    /// Writes `content` to a fresh temp file named after `doc`.
    pub fn stage(doc: &DocumentRecord, content: &DocumentContent) -> std::io::Result<Self> {
        let suffix = format!(".{}", extension_for(content));
        let prefix = format!("docdesk-{}-", safe_prefix(&doc.id));

        let mut file = Builder::new().prefix(&prefix).suffix(&suffix).tempfile()?;
        file.write_all(&content.bytes)?;
        file.flush()?;

        Ok(Self {
            file,
            content_type: content.content_type.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Copies the content to `destination`; the temp file is still removed
    /// on drop.
    pub fn save_copy(&self, destination: &Path) -> std::io::Result<PathBuf> {
        std::fs::copy(self.file.path(), destination)?;
        Ok(destination.to_path_buf())
    }
}

/// Extensions chosen first when a content type maps to several.
static PREFERRED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// Extension from the suggested file name, else from the content type,
/// else `bin`.
fn extension_for(content: &DocumentContent) -> String {
    if let Some(ext) = content
        .file_name
        .as_deref()
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
    {
        return ext.to_ascii_lowercase();
    }

    content
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(|exts| {
            PREFERRED_EXTENSIONS
                .iter()
                .find(|preferred| exts.contains(*preferred))
                .or_else(|| exts.first())
                .map(|ext| ext.to_string())
        })
        .unwrap_or_else(|| "bin".to_string())
}

fn safe_prefix(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(32)
        .collect()
}
