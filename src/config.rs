//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Parsing is done through
//! [`AppConfig::from_lookup`] so it can be exercised without touching the
//! process environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Name of the user that owns todos created without an explicit owner.
pub const DEFAULT_USERNAME: &str = "defaultuser";

/// Error raised when a configuration value is present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// `DATABASE_URL` could not be parsed as PostgreSQL connect options.
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[from] sqlx::Error),
}

/// Where todos and users are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through `sqlx`.
    Postgres,
    /// Process-local maps; contents are lost on restart.
    Memory,
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Overrides the individual parts when set.
    pub url: Option<String>,
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub name: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Seconds to wait when acquiring a pooled connection.
    pub acquire_timeout_secs: u64,
    /// Number of connection attempts made at startup.
    pub connect_attempts: u32,
    /// Seconds to sleep between startup connection attempts.
    pub connect_retry_delay_secs: u64,
}

impl DatabaseConfig {
    /// Builds `sqlx` connect options from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DatabaseUrl`] if `url` is set but malformed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(PgConnectOptions::from_str(url)?);
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable))
    }

    /// Delay between startup connection attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.connect_retry_delay_secs)
    }

    /// Pool acquire timeout.
    #[must_use]
    pub const fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Selected storage backend.
    pub storage: StorageBackend,

    /// PostgreSQL settings, used when `storage` is [`StorageBackend::Postgres`].
    pub database: DatabaseConfig,

    /// Username of the bootstrap user.
    pub default_username: String,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Falls back to defaults for missing keys. `PORT`, `LISTEN_HOST`,
    /// `STORAGE_BACKEND` and `LOG_FORMAT` are strict: an unparsable value is
    /// an error. Tuning knobs fall back to their default instead.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr =
            parse_strict(&lookup, "LISTEN_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parse_strict(&lookup, "PORT", 8080)?;

        let storage = match lookup("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") | Some("") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "STORAGE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") | Some("") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_env(&lookup, "DB_PORT", 5432),
            user: lookup("DB_USER").unwrap_or_else(|| "postgres".to_string()),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name: lookup("DB_NAME").unwrap_or_else(|| "todos".to_string()),
            max_connections: parse_env(&lookup, "DB_MAX_CONNECTIONS", 10),
            acquire_timeout_secs: parse_env(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5),
            connect_attempts: parse_env(&lookup, "DB_CONNECT_ATTEMPTS", 10_u32).max(1),
            connect_retry_delay_secs: parse_env(&lookup, "DB_CONNECT_RETRY_DELAY_SECS", 5),
        };

        let default_username = lookup("DEFAULT_USERNAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            storage,
            database,
            default_username,
            log_format,
        })
    }
}

/// Parses a lookup value as `T`, returning `default` on missing or invalid
/// values.
fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses a lookup value as `T`, returning `default` when missing or empty
/// and an error when present but invalid.
fn parse_strict<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}
