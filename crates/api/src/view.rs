//! HTML rendering

use crate::error::ApiError;
use crate::summary::MeasurementSummary;
use serde::Serialize;
use storage::{to_fixed, Dimension};
use tera::{Context, Tera};

const INDEX_TEMPLATE: &str = "index.html";

/// Values shown on the index page
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub length: String,
    pub width: String,
    pub height: String,
    pub area: String,
    pub volume: String,
    pub dimensions: Vec<&'static str>,
    pub error_message: Option<String>,
}

impl IndexPage {
    pub fn new(summary: &MeasurementSummary, error_message: Option<&str>) -> Self {
        Self {
            length: to_fixed(&summary.length),
            width: to_fixed(&summary.width),
            height: to_fixed(&summary.height),
            area: to_fixed(&summary.area),
            volume: to_fixed(&summary.volume),
            dimensions: Dimension::ALL.iter().map(|d| d.as_str()).collect(),
            error_message: error_message.map(str::to_string),
        }
    }
}

/// Compiled page templates
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile the embedded templates
    pub fn new() -> Result<Self, ApiError> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { tera })
    }

    pub fn render_index(&self, page: &IndexPage) -> Result<String, ApiError> {
        let context = Context::from_serialize(page)?;
        Ok(self.tera.render(INDEX_TEMPLATE, &context)?)
    }
}
