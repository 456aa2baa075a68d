//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::error::{RecorderError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` if set, else the configured directive.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            RecorderError::Config(format!("Invalid log filter '{}': {}", config.filter, e))
        }),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(config)?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| RecorderError::Config(format!("Failed to initialize logging: {}", e)))
}
