use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
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
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can drive it
/// from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = parse_u64(var, default)?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(secs)
    };

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"));

    let api_base_url = parse_base_url(&or_default(
        "STOREFRONT_API_BASE_URL",
        "http://localhost:5000/api",
    ))?;
    let data_dir = PathBuf::from(or_default("STOREFRONT_DATA_DIR", "./.storefront"));
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");

    let http_timeout_secs = parse_positive_secs("STOREFRONT_HTTP_TIMEOUT_SECS", "30")?;
    let checkout_timeout_secs = parse_positive_secs("STOREFRONT_CHECKOUT_TIMEOUT_SECS", "20")?;
    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront-cli/0.1");
    let max_retries = parse_u32("STOREFRONT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("STOREFRONT_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        api_base_url,
        data_dir,
        log_level,
        http_timeout_secs,
        checkout_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
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

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_API_BASE_URL".to_string(),
            reason: format!("'{raw}' is not an http(s) URL"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
