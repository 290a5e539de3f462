use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocdeskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote store error: {0}")]
    Api(#[from] ApiError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Failed to stage document content: {0}")]
    Stage(#[source] std::io::Error),
}

/// Failures talking to the remote document store.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Remote store returned {status}{}", format_detail(detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("No bearer credential available")]
    MissingCredential,

    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// Human-readable message supplied by the server, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

fn format_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Upload dialog is not open")]
    NoDraft,

    #[error("{0}")]
    Validation(String),

    #[error("An upload is already in progress")]
    AlreadyInFlight,

    #[error("{0}")]
    Rejected(String),

    #[error("Failed to read '{path}': {reason}")]
    ReadFile { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No credential source provided (need a token, token file or env var name)")]
    NoSourceProvided,

    #[error("Failed to read token from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

pub type Result<T> = std::result::Result<T, DocdeskError>;
