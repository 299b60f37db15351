//! Storage Layer
//!
//! Persists measurements and computes per-dimension averages. The
//! PostgreSQL store opens one connection per operation; the in-memory
//! store backs tests and database-less runs.

mod averages;
mod config;
mod postgres;
mod repository;
mod retry;

pub use averages::{round_to_scale, to_fixed, Averages, AVERAGE_SCALE};
pub use config::DatabaseConfig;
pub use data_validator::{Dimension, Measurement};
pub use postgres::PgRepository;
pub use repository::MemoryRepository;
pub use retry::{with_retry, RetryPolicy};

use async_trait::async_trait;
use thiserror::Error;
use tracing::error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not connect to database after {attempts} attempt(s): {message}")]
    ConnectionFailed { attempts: u32, message: String },
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid database configuration: {0}")]
    InvalidConfig(String),
}

/// Append-only measurement storage with aggregate reads
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Append one measurement row
    async fn insert(&self, measurement: &Measurement) -> Result<(), StorageError>;

    /// Per-dimension averages, rounded to [`AVERAGE_SCALE`] places
    async fn averages(&self) -> Result<Averages, StorageError>;

    /// Averages, or an empty mapping if the store is unreachable
    async fn averages_or_empty(&self) -> Averages {
        match self.averages().await {
            Ok(averages) => averages,
            Err(e) => {
                error!(error = %e, "Failed to fetch average measurements");
                Averages::new()
            }
        }
    }
}
