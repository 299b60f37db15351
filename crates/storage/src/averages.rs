//! Per-dimension averages

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use data_validator::Dimension;
use std::collections::BTreeMap;

/// Decimal places kept for averages and derived metrics
pub const AVERAGE_SCALE: i64 = 3;

/// Round half-to-even to [`AVERAGE_SCALE`] places
pub fn round_to_scale(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(AVERAGE_SCALE, RoundingMode::HalfEven)
}

/// Render a value with exactly [`AVERAGE_SCALE`] fractional digits
pub fn to_fixed(value: &BigDecimal) -> String {
    let (digits, _) = round_to_scale(value).as_bigint_and_exponent();
    let digits = digits.to_string();
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };

    let scale = AVERAGE_SCALE as usize;
    let padded = format!("{digits:0>width$}", width = scale + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{sign}{int_part}.{frac_part}")
}

/// Mapping of dimension to its rounded mean
///
/// Dimensions without stored rows are absent; [`Averages::get`] reads them
/// as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Averages {
    values: BTreeMap<Dimension, BigDecimal>,
}

impl Averages {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw mean, rounding it
    pub fn insert(&mut self, dimension: Dimension, mean: &BigDecimal) {
        self.values.insert(dimension, round_to_scale(mean));
    }

    /// Rounded mean for a dimension, zero when nothing is stored
    pub fn get(&self, dimension: Dimension) -> BigDecimal {
        self.values
            .get(&dimension)
            .cloned()
            .unwrap_or_else(|| round_to_scale(&BigDecimal::zero()))
    }

    /// Whether a dimension has stored rows
    pub fn contains(&self, dimension: Dimension) -> bool {
        self.values.contains_key(&dimension)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
