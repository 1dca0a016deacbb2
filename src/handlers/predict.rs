//! Prediction handler

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::API_VERSION;
use crate::features::FeatureMap;
use crate::risk::RiskAssessment;
use crate::{AppError, AppResult, AppState};

/// Prediction response: the assessment flattened to the top level, plus an
/// echo of the load-bearing inputs.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub input_summary: InputSummary,
    pub api_version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct InputSummary {
    pub slope_angle: f64,
    pub rock_strength: f64,
    pub rainfall_24h: f64,
    pub vibration_intensity: f64,
}

/// Assess rockfall risk for caller-supplied channels
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FeatureMap>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(input) = payload?;

    if input.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let missing = input.missing_required();
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let assessment = state.assess(&input)?;

    tracing::info!(
        "Prediction made: {} ({}%)",
        assessment.risk_category,
        assessment.risk_probability
    );

    // Absent optional channels echo as zero regardless of what the scorer
    // substituted internally.
    let input_summary = InputSummary {
        slope_angle: input.get_or("slope_angle", 0.0),
        rock_strength: input.get_or("rock_strength", 0.0),
        rainfall_24h: input.get_or("rainfall_24h", 0.0),
        vibration_intensity: input.get_or("vibration_intensity", 0.0),
    };

    Ok(Json(PredictResponse {
        assessment,
        input_summary,
        api_version: API_VERSION,
    }))
}
