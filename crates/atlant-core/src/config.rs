use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_LEAD_SOURCE: &str = "Сайт АТЛАНТ МЕТАЛЛ";
pub const DEFAULT_CONTACT_PHONE: &str = "+77472199369";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let bitrix_webhook_url = require("BITRIX_WEBHOOK_URL")?;
    check_http_url("BITRIX_WEBHOOK_URL", &bitrix_webhook_url)?;

    let env = parse_environment(&or_default("ATLANT_ENV", "development"));
    let log_level = or_default("ATLANT_LOG_LEVEL", "info");
    let lead_source = or_default("ATLANT_LEAD_SOURCE", DEFAULT_LEAD_SOURCE);
    let auto_close_ms = parse_u64("ATLANT_AUTO_CLOSE_MS", "3000")?;
    let contact_phone = or_default("ATLANT_CONTACT_PHONE", DEFAULT_CONTACT_PHONE);
    let crm_user_agent = or_default("ATLANT_CRM_USER_AGENT", "atlant-leads/0.1 (lead-capture)");
    let crm_connect_timeout_secs = parse_u64("ATLANT_CRM_CONNECT_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        log_level,
        bitrix_webhook_url,
        lead_source,
        auto_close_ms,
        contact_phone,
        crm_user_agent,
        crm_connect_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn check_http_url(var: &str, value: &str) -> Result<(), ConfigError> {
    let has_host = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
    if has_host {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected an http(s) URL, got '{value}'"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
