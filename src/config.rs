//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Seconds a request waits for a free pooled connection
    pub database_acquire_timeout_secs: u64,

    /// Row lock wait limit, applied per connection
    pub lock_timeout_ms: u64,

    /// Statement execution limit, applied per connection
    pub statement_timeout_ms: u64,

    /// Identity of this worker, embedded in transaction ids
    pub worker_id: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    pub log_format: LogFormat,

    /// Apply the bundled schema at startup
    pub run_migrations: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections: u32 =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
        if database_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"));
        }

        let database_acquire_timeout_secs = parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?;
        let lock_timeout_ms = parse_or(&lookup, "LOCK_TIMEOUT_MS", 5_000)?;
        let statement_timeout_ms = parse_or(&lookup, "STATEMENT_TIMEOUT_MS", 15_000)?;

        let worker_id = lookup("WORKER_ID").unwrap_or_else(|| "worker-1".to_string());
        if !is_valid_worker_id(&worker_id) {
            return Err(ConfigError::InvalidValue("WORKER_ID"));
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8081)?;

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LOG_FORMAT"))?,
            None => LogFormat::Text,
        };

        let run_migrations = parse_or(&lookup, "RUN_MIGRATIONS", false)?;

        Ok(Self {
            database_url,
            database_max_connections,
            database_acquire_timeout_secs,
            lock_timeout_ms,
            statement_timeout_ms,
            worker_id,
            host,
            port,
            log_format,
            run_migrations,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Worker ids end up inside transaction ids, keep them to a safe alphabet
fn is_valid_worker_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
