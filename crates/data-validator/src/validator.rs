//! Submission Validator

use crate::dimension::Dimension;
use crate::error::ValidationError;
use crate::normalizer::normalize_decimal_separator;
use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;
use tracing::debug;

/// Most digits allowed before the decimal point (PostgreSQL `numeric`)
pub const MAX_INTEGER_DIGITS: i64 = 131_072;

/// Most digits allowed after the decimal point (PostgreSQL `numeric`)
pub const MAX_SCALE: i64 = 16_383;

/// A validated measurement ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub dimension: Dimension,
    pub value: BigDecimal,
}

/// Validator for raw form submissions
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Parse a locale-tolerant decimal and require it to be positive
    pub fn validate_value(&self, raw: &str) -> Result<BigDecimal, ValidationError> {
        let normalized = normalize_decimal_separator(raw);
        let value = BigDecimal::from_str(&normalized)
            .map_err(|_| ValidationError::InvalidFormat(raw.to_string()))?;

        if !within_numeric_bounds(&value) {
            return Err(ValidationError::InvalidFormat(raw.to_string()));
        }

        if value <= BigDecimal::zero() {
            return Err(ValidationError::NotPositive(raw.trim().to_string()));
        }

        Ok(value)
    }

    /// Resolve a dimension name
    pub fn validate_dimension(&self, raw: &str) -> Result<Dimension, ValidationError> {
        raw.parse()
    }

    /// Validate a full submission; nothing is written unless this succeeds
    pub fn validate_submission(
        &self,
        dimension: &str,
        value: &str,
    ) -> Result<Measurement, ValidationError> {
        let dimension = self.validate_dimension(dimension)?;
        let value = self.validate_value(value)?;
        debug!(%dimension, %value, "Submission validated");
        Ok(Measurement { dimension, value })
    }
}

/// Whether `value` fits a PostgreSQL `numeric` column.
///
/// Checked on the unscaled digits and exponent so huge exponents are never
/// expanded.
fn within_numeric_bounds(value: &BigDecimal) -> bool {
    let (digits, scale) = value.as_bigint_and_exponent();
    let digit_count = digits.to_string().trim_start_matches('-').len() as i64;
    scale <= MAX_SCALE && digit_count - scale <= MAX_INTEGER_DIGITS
}
