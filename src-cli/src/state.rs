//! Application state for the CLI.

use std::path::Path;
use std::sync::Arc;

use docdesk::{
    credential_channel, load_config_or_default, resolve_credential, ClientConfig, Credential,
    CredentialPublisher, DocumentManager, HttpDocumentApi,
};
use log::{debug, warn};

pub type Manager = DocumentManager<HttpDocumentApi>;

/// Wires configuration, credentials and the document manager together.
pub struct AppState {
    pub config: ClientConfig,
    pub manager: Arc<Manager>,
    /// Kept alive so the credential channel stays open for the whole run.
    #[allow(dead_code)]
    pub credentials: CredentialPublisher,
}

/// Overrides taken from global command-line flags.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub config_path: Option<&'a Path>,
    pub base_url: Option<&'a str>,
    pub token: Option<&'a str>,
}

impl AppState {
    pub fn initialize(overrides: Overrides<'_>) -> Result<Self, String> {
        let mut config =
            load_config_or_default(overrides.config_path).map_err(|e| e.to_string())?;

        if let Some(base_url) = overrides.base_url {
            config.base_url = base_url.to_string();
            docdesk::config::validate_config(&config).map_err(|e| e.to_string())?;
        }

        let credential = match overrides.token {
            Some(token) => Credential::from_token(token),
            None => match resolve_credential(&config.credential) {
                Ok(credential) => Some(credential),
                Err(e) => {
                    warn!("No credential available: {}", e);
                    None
                }
            },
        };
        debug!("Credential present: {}", credential.is_some());

        let api = HttpDocumentApi::new(&config).map_err(|e| e.to_string())?;
        let (credentials, receiver) = credential_channel(credential);
        let manager = Arc::new(DocumentManager::new(
            api,
            receiver,
            config.upload.clone(),
        ));

        Ok(Self {
            config,
            manager,
            credentials,
        })
    }
}
