//! Derived metrics over current averages

use bigdecimal::BigDecimal;
use storage::{round_to_scale, Averages, Dimension};

/// Averages plus area and volume, all rounded to three places
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSummary {
    pub length: BigDecimal,
    pub width: BigDecimal,
    pub height: BigDecimal,
    pub area: BigDecimal,
    pub volume: BigDecimal,
}

impl MeasurementSummary {
    /// Compute area and volume from the (already rounded) averages
    pub fn from_averages(averages: &Averages) -> Self {
        let length = averages.get(Dimension::Length);
        let width = averages.get(Dimension::Width);
        let height = averages.get(Dimension::Height);

        let base = &length * &width;
        let area = round_to_scale(&base);
        let volume = round_to_scale(&(&base * &height));

        Self {
            length,
            width,
            height,
            area,
            volume,
        }
    }
}
