use crate::application::config::models::{Config, ServerConfig};
use crate::common::error::{Result, ServerError};
use crate::common::logger;

/// Validate startup configuration. Port 0 is rejected here because an
/// operator-facing server needs a known port; the library API still
/// accepts it through `ServerConfig`.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.port == 0 {
        return Err(ServerError::ConfigError(
            "port must be between 1 and 65535".to_string(),
        ));
    }

    validate_server_config(&config.server_config())?;
    logger::validate_level(&config.log_level)?;

    Ok(())
}

/// Checks shared by the startup path and `Server::start`
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.thread_count == 0 {
        return Err(ServerError::ConfigError(
            "thread_count must be greater than 0".to_string(),
        ));
    }

    if i32::try_from(config.backlog).is_err() {
        return Err(ServerError::ConfigError(format!(
            "backlog must be at most {}",
            i32::MAX
        )));
    }

    Ok(())
}
