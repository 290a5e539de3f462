pub mod loader;
pub mod schema;

pub use loader::{
    default_config_path, load_config, load_config_from_str, load_config_or_default,
    validate_config, ConfigFormat, BASE_URL_ENV_VAR,
};
pub use schema::{
    ClientConfig, CredentialConfig, EndpointsConfig, UploadPolicy, DEFAULT_TOKEN_ENV_VAR,
};
