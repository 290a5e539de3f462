pub mod api;
pub mod broadcast;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod manager;
pub mod model;
pub mod sanitize;
pub mod viewer;

pub use api::{DocumentApi, DocumentContent, HttpDocumentApi, UploadRequest};
pub use broadcast::{ManagerEvent, ManagerEventBroadcaster, ManagerEventKind};
pub use config::{load_config, load_config_or_default, ClientConfig, UploadPolicy};
pub use credentials::{credential_channel, resolve_credential, Credential, CredentialPublisher};
pub use error::{ApiError, ConfigError, CredentialError, DocdeskError, Result, UploadError};
pub use manager::{
    spawn_auto_refresh, AlwaysConfirm, AutoRefresh, ConfirmGate, DeleteOutcome, DocumentManager,
    LoadState, NeverConfirm, RefreshOutcome, UploadOutcome,
};
pub use model::{DocumentRecord, DocumentStatus, DocumentType, PendingFile, UploadDraft};
pub use viewer::EphemeralDocument;
