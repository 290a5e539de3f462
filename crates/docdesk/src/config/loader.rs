use std::path::{Path, PathBuf};

use crate::config::schema::ClientConfig;
use crate::error::ConfigError;

/// Overrides `baseUrl` from the file.
pub const BASE_URL_ENV_VAR: &str = "DOCDESK_BASE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// `<config dir>/docdesk/config.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docdesk").join("config.yaml"))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config = parse_config(&content, ConfigFormat::from_path(path))?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Loads from `path` when given, else the default location when it exists,
/// else built-in defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }

    if let Some(default_path) = default_config_path().filter(|p| p.is_file()) {
        log::debug!("Loading config from {}", default_path.display());
        return load_config(default_path);
    }

    let mut config = ClientConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Parses and validates `content`. Environment overrides are not applied.
pub fn load_config_from_str(
    content: &str,
    format: ConfigFormat,
) -> Result<ClientConfig, ConfigError> {
    let config = parse_config(content, format)?;
    validate_config(&config)?;
    Ok(config)
}

fn parse_config(content: &str, format: ConfigFormat) -> Result<ClientConfig, ConfigError> {
    Ok(match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    })
}

fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(base_url) = std::env::var(BASE_URL_ENV_VAR) {
        if !base_url.trim().is_empty() {
            config.base_url = base_url.trim().to_string();
        }
    }
}

pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(ConfigError::Validation {
            message: format!(
                "baseUrl must start with http:// or https://, got '{}'",
                config.base_url
            ),
        });
    }

    for (name, path) in [
        ("endpoints.list", &config.endpoints.list),
        ("endpoints.upload", &config.endpoints.upload),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation {
                message: format!("{} must start with '/', got '{}'", name, path),
            });
        }
    }

    if config.connect_timeout_secs == 0 || config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "Timeouts must be greater than zero".to_string(),
        });
    }

    if config
        .upload
        .allowed_extensions
        .iter()
        .any(|e| e.is_empty() || e.starts_with('.'))
    {
        return Err(ConfigError::Validation {
            message: "upload.allowedExtensions entries must be non-empty and have no leading dot"
                .to_string(),
        });
    }

    Ok(())
}
