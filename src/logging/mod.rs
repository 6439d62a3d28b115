//! Logging initialization for net-sentry
//!
//! Sets up the tracing subscriber from configuration: an env-filter built
//! from the configured level (overridable with `RUST_LOG`) and either a
//! JSON or human-readable output format.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Logging initialization errors
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Invalid log level or filter directive
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed
    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Initialize the global tracing subscriber
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}
