//! Storage for configuration and provider credentials.

pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_CONFIG, ENV_CREDENTIALS, ENV_INTERVAL, ENV_SHOW,
    ENV_WIDTH, ResolvedConfig,
};
pub use credentials::{CredentialStore, ProviderCredential};
pub use paths::AppPaths;
