//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use kora_db::DbConfig;
use kora_sales::EngineConfig;

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Retry budget for commits that hit lock contention, in milliseconds
    pub commit_max_retry_ms: u64,

    /// Stock alert queue capacity
    pub notify_queue_capacity: usize,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            http_port: parse(&get, "KORA_HTTP_PORT", 8080)?,

            database_path: get("KORA_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./kora.db")),

            db_max_connections: parse(&get, "KORA_DB_MAX_CONNECTIONS", 5)?,

            commit_max_retry_ms: parse(&get, "KORA_COMMIT_MAX_RETRY_MS", 2_000)?,

            notify_queue_capacity: parse(&get, "KORA_NOTIFY_QUEUE_CAPACITY", 256)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("KORA_DB_MAX_CONNECTIONS".to_string()));
        }
        if config.notify_queue_capacity == 0 {
            return Err(ConfigError::InvalidValue("KORA_NOTIFY_QUEUE_CAPACITY".to_string()));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }

    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .commit_max_retry(Duration::from_millis(self.commit_max_retry_ms))
            .notify_queue_capacity(self.notify_queue_capacity)
    }
}

fn parse<F, T>(get: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
