//! Validation Error Types

use thiserror::Error;

/// Errors during submission validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value could not be parsed as a decimal
    #[error("Invalid decimal value: {0:?}")]
    InvalidFormat(String),

    /// Value parsed but is zero or negative
    #[error("Value must be positive, got {0}")]
    NotPositive(String),

    /// Dimension name is not one of the known dimensions
    #[error("Unknown dimension: {0:?}")]
    UnknownDimension(String),
}
