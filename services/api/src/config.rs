//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use tracing::Level;

const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub cors_allowed_origin: String,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            db_max_connections: 5,
            log_level: Level::INFO,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        // --- Server and Database Settings ---
        let bind_address = parse_var("BIND_ADDRESS", defaults.bind_address)?;
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- HTTP Settings ---
        let cors_allowed_origin =
            std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.cors_allowed_origin);
        HeaderValue::from_str(&cors_allowed_origin).map_err(|e| {
            ConfigError::InvalidValue("CORS_ALLOWED_ORIGIN".to_string(), e.to_string())
        })?;
        let max_body_bytes = parse_var("MAX_BODY_BYTES", defaults.max_body_bytes)?;

        Ok(Self {
            bind_address,
            database_url,
            db_max_connections,
            log_level,
            cors_allowed_origin,
            max_body_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_reports_the_variable_name() {
        std::env::set_var("PAGE_BUILDER_TEST_PORT", "not-a-number");
        let err = parse_var::<u32>("PAGE_BUILDER_TEST_PORT", 1).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "PAGE_BUILDER_TEST_PORT"));
    }

    #[test]
    fn parse_var_falls_back_to_default() {
        assert_eq!(parse_var("PAGE_BUILDER_TEST_UNSET", 7u32).unwrap(), 7);
    }
}
