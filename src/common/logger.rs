use crate::common::error::{Result, ServerError};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `level` when it is set. Thread names are
/// printed so every line shows the worker that produced it.
pub fn init(level: &str) -> Result<()> {
    let filter = build_filter(level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .try_init()
        .map_err(|e| ServerError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level)
        .map_err(|e| ServerError::ConfigError(format!("Invalid log level '{}': {}", level, e)))
}

/// Check a level string without installing anything.
pub fn validate_level(level: &str) -> Result<()> {
    EnvFilter::try_new(level)
        .map(|_| ())
        .map_err(|e| ServerError::ConfigError(format!("Invalid log level '{}': {}", level, e)))
}
