//! Upload dialog state.
//!
//! An [`UploadDraft`] lives only while the upload dialog is open. The
//! manager creates it on open, mutates it through user input and submit
//! attempts, and drops it on close.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::UploadPolicy;
use crate::error::UploadError;

/// Message shown when submit is attempted without a file or title.
pub const MISSING_FILE_OR_TITLE: &str = "Please select a file and enter a title.";

/// Category chosen for an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[default]
    Policy,
    Law,
    Contract,
    Guide,
    News,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Policy,
        DocumentType::Law,
        DocumentType::Contract,
        DocumentType::Guide,
        DocumentType::News,
    ];

    /// Value sent in the `document_type` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Policy => "Policy",
            DocumentType::Law => "Law",
            DocumentType::Contract => "Contract",
            DocumentType::Guide => "Guide",
            DocumentType::News => "News",
        }
    }

    /// Longer label for pickers.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Policy => "Policy Document",
            DocumentType::Law => "Law / Statute",
            DocumentType::Contract => "Contract Template",
            DocumentType::Guide => "Guide / Manual",
            DocumentType::News => "News Article",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let expected: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
                format!(
                    "Unknown document type '{}'. Expected one of: {}",
                    s,
                    expected.join(", ")
                )
            })
    }
}

/// A binary payload waiting to be uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl std::fmt::Debug for PendingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl PendingFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name).first_raw().map(str::to_string);
        Self {
            name,
            bytes: bytes.into(),
            mime_type,
        }
    }

    /// Reads a file from disk, keeping only its file name.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::ReadFile {
                path: path.to_path_buf(),
                reason: "path has no file name".to_string(),
            })?
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::ReadFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self::new(name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased extension after the last dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Whole megabytes when the limit is at least 1 MiB, else kilobytes or bytes.
fn format_size_limit(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Strips the last `.ext` from a file name. Names without an extension are
/// returned unchanged.
pub fn title_from_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => {
            name[..dot].to_string()
        }
        _ => name.to_string(),
    }
}

/// Identifies one submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(Uuid);

impl UploadTicket {
    pub(crate) fn issue() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for UploadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a draft is in its submit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    /// Accepting input. `error` holds the last failure, if any.
    Editing { error: Option<String> },
    /// A submit is outstanding under `ticket`.
    Submitting { ticket: UploadTicket },
}

impl Default for UploadPhase {
    fn default() -> Self {
        UploadPhase::Editing { error: None }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadDraft {
    file: Option<PendingFile>,
    title: String,
    document_type: DocumentType,
    phase: UploadPhase,
}

impl UploadDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&PendingFile> {
        self.file.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            UploadPhase::Editing { error } => error.as_deref(),
            UploadPhase::Submitting { .. } => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, UploadPhase::Submitting { .. })
    }

    pub(crate) fn ticket(&self) -> Option<UploadTicket> {
        match self.phase {
            UploadPhase::Submitting { ticket } => Some(ticket),
            UploadPhase::Editing { .. } => None,
        }
    }

    /// Replaces the pending file. The title is derived from the file name
    /// only while it is still empty.
    pub fn select_file(&mut self, file: PendingFile) {
        if self.title.is_empty() {
            self.title = title_from_file_name(&file.name);
        }
        self.file = Some(file);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_document_type(&mut self, document_type: DocumentType) {
        self.document_type = document_type;
    }

    /// Checks the draft can be submitted under `policy` and returns the file
    /// that would be sent.
    pub fn validate(&self, policy: &UploadPolicy) -> Result<&PendingFile, String> {
        let file = match &self.file {
            Some(file) if !self.title.trim().is_empty() => file,
            _ => return Err(MISSING_FILE_OR_TITLE.to_string()),
        };

        if !policy.allowed_extensions.is_empty() {
            let allowed = file.extension().is_some_and(|ext| {
                policy
                    .allowed_extensions
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(&ext))
            });
            if !allowed {
                let list: Vec<String> = policy
                    .allowed_extensions
                    .iter()
                    .map(|e| e.to_ascii_uppercase())
                    .collect();
                return Err(format!(
                    "Unsupported file type '{}'. Allowed: {}",
                    file.name,
                    list.join(", ")
                ));
            }
        }

        if let Some(max) = policy.max_bytes {
            if file.len() as u64 > max {
                return Err(format!(
                    "File is too large ({} bytes). Maximum is {}",
                    file.len(),
                    format_size_limit(max)
                ));
            }
        }

        Ok(file)
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.phase = UploadPhase::Editing {
            error: Some(message.into()),
        };
    }

    /// Moves into `Submitting`, clearing any previous error.
    pub(crate) fn begin_submit(&mut self, ticket: UploadTicket) {
        self.phase = UploadPhase::Submitting { ticket };
    }
}
