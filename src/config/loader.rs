//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Config;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    from_toml(&content)
}

/// Parse and validate configuration from a TOML string.
pub fn from_toml(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Semantic checks serde cannot express.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.bind_address.is_empty() {
        return Err(ConfigError::Validation(
            "server.bind_address must not be empty".into(),
        ));
    }
    if config.store.endpoints.is_empty() {
        return Err(ConfigError::Validation(
            "store.endpoints must list at least one endpoint".into(),
        ));
    }
    if config.store.root_path.is_empty() {
        return Err(ConfigError::Validation(
            "store.root_path must not be empty".into(),
        ));
    }
    if config.store.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "store.connect_timeout_secs must be greater than zero".into(),
        ));
    }
    Ok(())
}
