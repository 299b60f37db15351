//! Measurement Routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use data_validator::ValidationError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::summary::MeasurementSummary;
use crate::view::IndexPage;
use crate::AppState;

pub const INVALID_VALUE_MESSAGE: &str = "Invalid value. Enter a positive number.";
pub const UNKNOWN_DIMENSION_MESSAGE: &str = "Unknown dimension. Choose length, width or height.";
pub const CONNECTIVITY_MESSAGE: &str = "Could not connect to the database. Please try again.";

/// Form body for `POST /`
#[derive(Debug, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub value: String,
}

/// Render the page with current averages
pub async fn show_index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_current(&state, None).await.map(Html)
}

/// Validate and store a submission, then redirect back to the index
pub async fn submit_measurement(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubmissionForm>,
) -> Result<Response, ApiError> {
    let measurement = match state
        .validator
        .validate_submission(&form.dimension, &form.value)
    {
        Ok(measurement) => measurement,
        Err(e) => {
            warn!(
                error = %e,
                dimension = %form.dimension,
                value = %form.value,
                "Rejected submission"
            );
            let message = match e {
                ValidationError::UnknownDimension(_) => UNKNOWN_DIMENSION_MESSAGE,
                _ => INVALID_VALUE_MESSAGE,
            };
            return error_page(&state, StatusCode::UNPROCESSABLE_ENTITY, message).await;
        }
    };

    if let Err(e) = state.store.insert(&measurement).await {
        error!(error = %e, dimension = %measurement.dimension, "Failed to store measurement");
        return error_page(&state, StatusCode::SERVICE_UNAVAILABLE, CONNECTIVITY_MESSAGE).await;
    }

    info!(
        dimension = %measurement.dimension,
        value = %measurement.value,
        "Stored measurement"
    );
    Ok(Redirect::to("/").into_response())
}

async fn error_page(
    state: &AppState,
    status: StatusCode,
    message: &str,
) -> Result<Response, ApiError> {
    let html = render_current(state, Some(message)).await?;
    Ok((status, Html(html)).into_response())
}

async fn render_current(state: &AppState, error_message: Option<&str>) -> Result<String, ApiError> {
    let averages = state.store.averages_or_empty().await;
    let summary = MeasurementSummary::from_averages(&averages);
    state
        .templates
        .render_index(&IndexPage::new(&summary, error_message))
}
