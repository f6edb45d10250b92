//! Tracing subscriber setup for hosts embedding the lead form.

use tracing_subscriber::EnvFilter;

use crate::{AppConfig, ConfigError};

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `config.log_level` is used.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if the configured level is not a
/// valid filter, or [`ConfigError::Tracing`] if a global subscriber is
/// already installed.
pub fn init_tracing(config: &AppConfig) -> Result<(), ConfigError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => fallback_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|e| ConfigError::Tracing(e.to_string()))
}

fn fallback_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(level).map_err(|e| ConfigError::InvalidEnvVar {
        var: "ATLANT_LOG_LEVEL".to_string(),
        reason: e.to_string(),
    })
}
