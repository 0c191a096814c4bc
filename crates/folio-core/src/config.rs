use std::collections::BTreeMap;

use crate::app_config::{AppConfig, Environment};
use crate::stats::Platform;
use crate::ConfigError;

/// Desktop browser `User-Agent`; profile pages serve stripped markup to
/// unknown agents.
pub const DEFAULT_SCRAPER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

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
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    // Empty values count as unset so `.env` templates can leave keys blank.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FOLIO_ENV", "development"))?;

    let database_url = optional("DATABASE_URL");
    if database_url.is_none() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let bind_addr = parse_addr("FOLIO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FOLIO_LOG_LEVEL", "info");
    let api_keys = split_list(&or_default("FOLIO_API_KEYS", ""));

    let db_max_connections = parse_u32("FOLIO_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("FOLIO_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FOLIO_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("FOLIO_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("FOLIO_SCRAPER_USER_AGENT", DEFAULT_SCRAPER_USER_AGENT);
    let scraper_max_retries = parse_u32("FOLIO_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_secs = parse_u64("FOLIO_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    let mut social_handles = BTreeMap::new();
    for platform in Platform::ALL {
        let var = handle_var(platform);
        if let Some(handle) = optional(&var) {
            let handle = handle.trim_start_matches('@');
            if !is_valid_handle(handle) {
                return Err(invalid(
                    &var,
                    format!("handle \"{handle}\" has characters not allowed in a profile path"),
                ));
            }
            social_handles.insert(platform, handle.to_string());
        }
    }

    let github_username = optional("FOLIO_GITHUB_USERNAME");
    let github_top_langs = parse_usize("FOLIO_GITHUB_TOP_LANGS", "3")?;
    if github_top_langs == 0 {
        return Err(invalid("FOLIO_GITHUB_TOP_LANGS", "must be at least 1".to_string()));
    }

    let app_ids = split_list(&or_default("FOLIO_APP_IDS", ""));
    if let Some(bad) = app_ids.iter().find(|id| !is_numeric_id(id)) {
        return Err(invalid(
            "FOLIO_APP_IDS",
            format!("app ID \"{bad}\" is not numeric"),
        ));
    }

    let social_cron = or_default("FOLIO_SOCIAL_CRON", "0 0 6 * * *");
    let github_cron = or_default("FOLIO_GITHUB_CRON", "0 10 6 * * *");
    let apps_cron = or_default("FOLIO_APPS_CRON", "0 20 6 * * *");

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        api_keys,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        social_handles,
        github_username,
        github_top_langs,
        app_ids,
        social_cron,
        github_cron,
        apps_cron,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOLIO_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Env var carrying the profile handle for `platform`, e.g. `FOLIO_TIKTOK_HANDLE`.
fn handle_var(platform: Platform) -> String {
    format!("FOLIO_{}_HANDLE", platform.as_str().to_ascii_uppercase())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Returns `true` for a non-empty all-ASCII-digit identifier (App Store IDs).
#[must_use]
pub fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// A handle that can be spliced into a profile URL path unchanged.
#[must_use]
pub fn is_valid_handle(handle: &str) -> bool {
    handle.bytes().any(|b| b != b'.')
        && handle
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
