use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, Platform};

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
/// Platform credentials are optional here; they are checked per selected
/// platform when a run is planned.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

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

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("SMDB_ENV", "development"))?;
    let log_level = or_default("SMDB_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("SMDB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SMDB_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "SMDB_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "must not exceed SMDB_DB_MAX_CONNECTIONS ({db_max_connections})"
            ),
        });
    }
    let db_acquire_timeout_secs = parse_u64("SMDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let graph_api_version = or_default("SMDB_GRAPH_API_VERSION", "v18.0");
    let graph_base_url = or_default("SMDB_GRAPH_BASE_URL", "https://graph.facebook.com");
    let request_timeout_secs = parse_u64("SMDB_REQUEST_TIMEOUT_SECS", "20")?;
    let user_agent = or_default("SMDB_USER_AGENT", "smdb/0.1 (social-ingest)");
    let upsert_delay_ms = parse_u64("SMDB_UPSERT_DELAY_MS", "200")?;
    let default_limit = parse_limit(&or_default("SMDB_DEFAULT_LIMIT", "50"))?;
    let default_platforms =
        parse_platform_list(&or_default("SMDB_DEFAULT_PLATFORMS", "facebook,instagram"))?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        graph_api_version,
        graph_base_url,
        request_timeout_secs,
        user_agent,
        upsert_delay_ms,
        default_limit,
        default_platforms,
        fb_access_token: optional("FB_ACCESS_TOKEN"),
        fb_page_id: optional("FB_PAGE_ID"),
        ig_access_token: optional("IG_ACCESS_TOKEN"),
        ig_user_id: optional("IG_USER_ID"),
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SMDB_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "SMDB_DEFAULT_LIMIT".to_string(),
        reason,
    };
    match raw.parse::<usize>() {
        Ok(0) => Err(invalid("must be greater than zero".to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Parse a comma-separated platform list. Blank input yields an empty list.
fn parse_platform_list(raw: &str) -> Result<Vec<Platform>, ConfigError> {
    let mut platforms = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let platform = name
            .parse::<Platform>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "SMDB_DEFAULT_PLATFORMS".to_string(),
                reason: e.to_string(),
            })?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    Ok(platforms)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
