//! In-memory repository

use crate::averages::Averages;
use crate::{MeasurementStore, StorageError};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use data_validator::{Dimension, Measurement};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Repository that keeps measurements in process memory
///
/// Nothing survives a restart. Used for tests and for running the
/// server without a database.
pub struct MemoryRepository {
    rows: Mutex<Vec<Measurement>>,
}

impl MemoryRepository {
    /// Create an empty in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory repository");
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored measurements
    pub fn count(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Stored values for one dimension, in insertion order
    pub fn values(&self, dimension: Dimension) -> Vec<BigDecimal> {
        self.rows
            .lock()
            .map(|rows| {
                rows.iter()
                    .filter(|m| m.dimension == dimension)
                    .map(|m| m.value.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeasurementStore for MemoryRepository {
    async fn insert(&self, measurement: &Measurement) -> Result<(), StorageError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;
        rows.push(measurement.clone());
        debug!(
            dimension = %measurement.dimension,
            value = %measurement.value,
            "Inserted measurement"
        );
        Ok(())
    }

    async fn averages(&self) -> Result<Averages, StorageError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;

        let mut groups: BTreeMap<Dimension, (BigDecimal, u64)> = BTreeMap::new();
        for m in rows.iter() {
            let entry = groups
                .entry(m.dimension)
                .or_insert_with(|| (BigDecimal::from(0u64), 0));
            entry.0 += &m.value;
            entry.1 += 1;
        }

        let mut averages = Averages::new();
        for (dimension, (sum, count)) in groups {
            averages.insert(dimension, &(sum / BigDecimal::from(count)));
        }
        Ok(averages)
    }
}
