use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or admin keys are missing outside
/// development.
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
/// Returns `ConfigError` if values are invalid or admin keys are missing outside
/// development.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SOULCARE_ENV", "development"))?;
    let bind_addr = parse_addr("SOULCARE_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("SOULCARE_LOG_LEVEL", "info");
    let data_file = PathBuf::from(or_default("SOULCARE_DATA_FILE", "./complaints.json"));

    let admin_keys: std::collections::HashSet<String> = or_default("SOULCARE_ADMIN_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if admin_keys.is_empty() && env != Environment::Development {
        return Err(ConfigError::MissingEnvVar("SOULCARE_ADMIN_KEYS".to_string()));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_file,
        admin_keys,
    })
}

/// Parse a string into an `Environment` variant, ignoring case and whitespace.
///
/// Unknown values are rejected so a typo cannot silently select development
/// and disable admin auth.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SOULCARE_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}
