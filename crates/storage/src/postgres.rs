//! PostgreSQL-backed measurement store

use crate::averages::Averages;
use crate::config::DatabaseConfig;
use crate::retry::{with_retry, RetryPolicy};
use crate::{MeasurementStore, StorageError};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use data_validator::{Dimension, Measurement};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, info, warn};

const CREATE_TABLE_SQL: &str =
    "CREATE TABLE IF NOT EXISTS measurements (dimension TEXT NOT NULL, value NUMERIC NOT NULL)";
const INSERT_SQL: &str = "INSERT INTO measurements (dimension, value) VALUES ($1, $2)";
const AVERAGES_SQL: &str = "SELECT dimension, AVG(value) FROM measurements GROUP BY dimension";

/// Store that opens a fresh connection for every operation
#[derive(Clone)]
pub struct PgRepository {
    options: PgConnectOptions,
    retry: RetryPolicy,
}

impl PgRepository {
    /// Create a store from connection parameters. No connection is made yet.
    pub fn new(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let options = config.connect_options()?;
        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            sslmode = %config.sslmode,
            "Configured PostgreSQL repository"
        );
        Ok(Self {
            options,
            retry: config.retry_policy(),
        })
    }

    /// Create the `measurements` table if it is missing
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(CREATE_TABLE_SQL)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::DatabaseError(format!("Failed to create table: {}", e)));
        close(conn).await;
        result
    }

    async fn connect(&self) -> Result<PgConnection, StorageError> {
        let conn = with_retry(self.retry, "connect", || {
            PgConnection::connect_with(&self.options)
        })
        .await
        .map_err(|e| StorageError::ConnectionFailed {
            attempts: self.retry.max_attempts.max(1),
            message: e.to_string(),
        })?;
        debug!("Database connection opened");
        Ok(conn)
    }

    async fn insert_in_transaction(
        conn: &mut PgConnection,
        measurement: &Measurement,
    ) -> Result<(), StorageError> {
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let inserted = sqlx::query(INSERT_SQL)
            .bind(measurement.dimension.as_str())
            .bind(measurement.value.clone())
            .execute(&mut *tx)
            .await;

        match inserted {
            Ok(_) => tx
                .commit()
                .await
                .map_err(|e| StorageError::DatabaseError(format!("Failed to commit: {}", e))),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(StorageError::DatabaseError(format!("Failed to insert measurement: {}", e)))
            }
        }
    }
}

#[async_trait]
impl MeasurementStore for PgRepository {
    async fn insert(&self, measurement: &Measurement) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let result = Self::insert_in_transaction(&mut conn, measurement).await;
        close(conn).await;

        if result.is_ok() {
            debug!(
                dimension = %measurement.dimension,
                value = %measurement.value,
                "Inserted measurement"
            );
        }
        result
    }

    async fn averages(&self) -> Result<Averages, StorageError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, (String, Option<BigDecimal>)>(AVERAGES_SQL)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Failed to query averages: {}", e)));
        close(conn).await;

        Ok(collect_averages(rows?))
    }
}

/// Fold `(dimension, mean)` rows into rounded averages, skipping unknown
/// dimension names and NULL means
fn collect_averages(rows: Vec<(String, Option<BigDecimal>)>) -> Averages {
    let mut averages = Averages::new();
    for (name, mean) in rows {
        match (name.parse::<Dimension>(), mean) {
            (Ok(dimension), Some(mean)) => averages.insert(dimension, &mean),
            _ => debug!(dimension = %name, "Skipping average row"),
        }
    }
    averages
}

async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close database connection cleanly");
    }
}
