use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PRENSA_ENV", "development"));
    let log_level = or_default("PRENSA_LOG_LEVEL", "info");
    let sites_path = PathBuf::from(or_default("PRENSA_SITES_PATH", "./config/sites.yaml"));
    let output_dir = PathBuf::from(or_default("PRENSA_OUTPUT_DIR", "./output/competitors"));

    let request_timeout_secs = parse_u64("PRENSA_REQUEST_TIMEOUT_SECS", "15")?;
    let max_concurrent_sites = parse_usize("PRENSA_MAX_CONCURRENT_SITES", "3")?;
    let max_articles = parse_usize("PRENSA_MAX_ARTICLES", "50")?;
    let days_back = parse_i64("PRENSA_DAYS_BACK", "1")?;

    let delay_min_ms = parse_u64("PRENSA_INTER_REQUEST_DELAY_MIN_MS", "500")?;
    let delay_max_ms = parse_u64("PRENSA_INTER_REQUEST_DELAY_MAX_MS", "1500")?;
    if delay_min_ms > delay_max_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRENSA_INTER_REQUEST_DELAY_MIN_MS".to_string(),
            reason: format!("minimum delay {delay_min_ms}ms exceeds maximum {delay_max_ms}ms"),
        });
    }

    let max_retries = parse_u32("PRENSA_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("PRENSA_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        env,
        log_level,
        sites_path,
        output_dir,
        request_timeout_secs,
        max_concurrent_sites,
        max_articles,
        days_back,
        inter_request_delay_ms: (delay_min_ms, delay_max_ms),
        max_retries,
        retry_backoff_base_secs,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
