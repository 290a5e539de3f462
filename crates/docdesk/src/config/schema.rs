use serde::{Deserialize, Serialize};

/// Environment variable read for the bearer token when no other source is set.
pub const DEFAULT_TOKEN_ENV_VAR: &str = "DOCDESK_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub upload: UploadPolicy,
    #[serde(default)]
    pub credential: CredentialConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: EndpointsConfig::default(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            upload: UploadPolicy::default(),
            credential: CredentialConfig::default(),
        }
    }
}

/// Paths appended to `base_url`. Delete and content paths hang off `list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointsConfig {
    #[serde(default = "default_list_path")]
    pub list: String,
    #[serde(default = "default_upload_path")]
    pub upload: String,
}

fn default_list_path() -> String {
    "/documents".to_string()
}

fn default_upload_path() -> String {
    "/documents/upload".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            list: default_list_path(),
            upload: default_upload_path(),
        }
    }
}

/// Client-side limits checked before an upload leaves the machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadPolicy {
    /// Lowercase extensions without the dot. Empty accepts anything.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: Option<u64>,
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string(), "docx".to_string(), "txt".to_string()]
}

fn default_max_bytes() -> Option<u64> {
    Some(10 * 1024 * 1024)
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_bytes: default_max_bytes(),
        }
    }
}

/// Where the bearer token comes from, in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,
    #[serde(default = "default_token_env_var")]
    pub token_env_var: Option<String>,
}

fn default_token_env_var() -> Option<String> {
    Some(DEFAULT_TOKEN_ENV_VAR.to_string())
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_file: None,
            token_env_var: default_token_env_var(),
        }
    }
}
