//! Server configuration
//!
//! Loaded from `APP_*` and `DB_*` environment variables, after an optional
//! `.env` file has been read into the environment.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use storage::DatabaseConfig;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which measurement store backs the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub store: StoreKind,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_format: LogFormat::default(),
            store: StoreKind::default(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Present when `server.store` is [`StoreKind::Postgres`]
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load `.env` (if any) and read configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_environment(Environment::with_prefix("APP"), Environment::with_prefix("DB"))
    }

    /// Build configuration from explicit environment sources
    pub fn from_environment(app: Environment, db: Environment) -> Result<Self, ConfigError> {
        let server: ServerConfig = Config::builder()
            .add_source(app)
            .build()?
            .try_deserialize()?;

        let database = match server.store {
            StoreKind::Postgres => Some(
                Config::builder()
                    .add_source(db)
                    .build()?
                    .try_deserialize::<DatabaseConfig>()?,
            ),
            StoreKind::Memory => None,
        };

        Ok(Self { server, database })
    }
}
