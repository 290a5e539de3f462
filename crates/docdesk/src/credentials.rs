//! Bearer credential resolution and hand-off.
//!
//! Tokens are resolved from multiple sources in priority order:
//!
//! 1. **Direct value** - `token: "..."` in the config, or `--token`
//! 2. **File reference** - `tokenFile: /run/secrets/docdesk`
//! 3. **Env var reference** - `tokenEnvVar: DOCDESK_TOKEN`
//!
//! The resolved token is published on a [`watch`] channel. The document
//! manager reads the latest value at request time and the auto-refresh task
//! wakes up when a usable token first appears.

use std::fs;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::config::CredentialConfig;
use crate::error::CredentialError;

pub type Result<T> = std::result::Result<T, CredentialError>;

/// An opaque bearer token. Never empty.
pub struct Credential(SecretString);

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self(SecretString::from(self.0.expose_secret().to_string()))
    }
}

impl Credential {
    /// Wraps `token`, returning `None` for an empty or whitespace-only value.
    pub fn from_token(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(trimmed.to_string())))
        }
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Resolves a token from the configured sources.
///
/// An empty direct value or empty file content is treated as absent so the
/// next source gets a chance, matching how blank tokens never trigger a
/// refresh.
pub fn resolve_credential(config: &CredentialConfig) -> Result<Credential> {
    // Priority 1: Direct value
    if let Some(credential) = config.token.as_deref().and_then(Credential::from_token) {
        return Ok(credential);
    }

    // Priority 2: File
    if let Some(path) = config.token_file.as_deref().filter(|p| !p.is_empty()) {
        let expanded = expand_home(path);
        let content =
            fs::read_to_string(&expanded).map_err(|e| CredentialError::FileReadError {
                path: expanded.clone(),
                source: e,
            })?;
        if let Some(credential) = Credential::from_token(content) {
            return Ok(credential);
        }
    }

    // Priority 3: Environment variable
    if let Some(var_name) = config.token_env_var.as_deref().filter(|v| !v.is_empty()) {
        return match std::env::var(var_name) {
            Ok(value) => Credential::from_token(value).ok_or(CredentialError::EnvVarNotSet {
                name: var_name.to_string(),
            }),
            Err(std::env::VarError::NotPresent) => Err(CredentialError::EnvVarNotSet {
                name: var_name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(CredentialError::EnvVarNotUnicode {
                name: var_name.to_string(),
            }),
        };
    }

    Err(CredentialError::NoSourceProvided)
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    path.to_string()
}

/// Publishing side of the credential channel, held by whatever acquires
/// tokens (a login flow, a config reload, a test).
#[derive(Debug, Clone)]
pub struct CredentialPublisher {
    sender: Arc<watch::Sender<Option<Credential>>>,
}

impl CredentialPublisher {
    pub fn publish(&self, credential: Option<Credential>) {
        self.sender.send_replace(credential);
    }

    /// Publishes a raw token. Blank tokens publish `None`.
    pub fn publish_token(&self, token: impl Into<String>) {
        self.publish(Credential::from_token(token));
    }

    pub fn clear(&self) {
        self.publish(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.sender.subscribe()
    }
}

/// Creates a credential channel seeded with `initial`.
pub fn credential_channel(
    initial: Option<Credential>,
) -> (CredentialPublisher, watch::Receiver<Option<Credential>>) {
    let (sender, receiver) = watch::channel(initial);
    (
        CredentialPublisher {
            sender: Arc::new(sender),
        },
        receiver,
    )
}
