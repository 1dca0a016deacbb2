//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::features::REQUIRED_CHANNELS;
use crate::model::ModelError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request errors
    /// Body was not a JSON object
    NotJson,
    /// Body was an empty JSON object
    EmptyInput,
    /// Required channels absent from the request
    MissingFields(Vec<&'static str>),
    /// Trained-model input contract violated
    ModelInput(String),

    // Routing errors
    NotFound,

    // Generic errors
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotJson => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Request must contain JSON data" }),
            ),
            AppError::EmptyInput => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No input data provided" }),
            ),
            AppError::MissingFields(missing) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": format!("Missing required fields: {}", missing.join(", ")),
                    "required_fields": REQUIRED_CHANNELS,
                }),
            ),
            AppError::ModelInput(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg }),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Endpoint not found" }),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(_: JsonRejection) -> Self {
        AppError::NotJson
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MissingFeature(channel) => {
                AppError::ModelInput(format!("Missing required feature: {channel}"))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}
