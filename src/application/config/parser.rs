use crate::application::config::models::Config;
use crate::common::error::{Result, ServerError};
use std::fs;
use std::path::Path;

/// Read a TOML file; missing keys take their defaults, unknown keys are
/// rejected.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        ServerError::ConfigError(format!("Failed to read config file '{}': {}", path.display(), e))
    })?;

    parse_config(&content).map_err(|e| match e {
        ServerError::ConfigError(msg) => {
            ServerError::ConfigError(format!("{} ({})", msg, path.display()))
        }
        other => other,
    })
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content)
        .map_err(|e| ServerError::ConfigError(format!("Invalid TOML config: {}", e)))
}
