pub mod document;
pub mod draft;

pub use document::{DocumentRecord, DocumentStatus, DEFAULT_CATEGORY, DEFAULT_DOCUMENT_TYPE};
pub use draft::{
    title_from_file_name, DocumentType, PendingFile, UploadDraft, UploadPhase, UploadTicket,
    MISSING_FILE_OR_TITLE,
};
