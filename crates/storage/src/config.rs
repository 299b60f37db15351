//! Database connection configuration

use crate::retry::RetryPolicy;
use crate::StorageError;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Connection parameters for the PostgreSQL store
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name
    pub name: String,
    /// libpq-style sslmode (`disable`, `prefer`, `require`, ...)
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_sslmode() -> String {
    "require".to_string()
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    3000
}

impl DatabaseConfig {
    /// Build a config with default host, port, sslmode and retry settings
    pub fn new(user: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: user.into(),
            password: password.into(),
            name: name.into(),
            sslmode: default_sslmode(),
            connect_attempts: default_connect_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }

    /// Parsed sslmode
    pub fn ssl_mode(&self) -> Result<PgSslMode, StorageError> {
        PgSslMode::from_str(&self.sslmode)
            .map_err(|_| StorageError::InvalidConfig(format!("unknown sslmode {:?}", self.sslmode)))
    }

    /// Driver connect options; the password is passed through unencoded
    pub fn connect_options(&self) -> Result<PgConnectOptions, StorageError> {
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode()?))
    }

    /// Retry policy for opening connections
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.connect_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .field("connect_attempts", &self.connect_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}
