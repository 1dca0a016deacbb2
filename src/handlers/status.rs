//! Status handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::API_VERSION;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub model_status: &'static str,
}

/// Service directory at the root path
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Rockfall Prediction API",
        "status": "online",
        "version": API_VERSION,
        "model_loaded": state.model_loaded(),
        "endpoints": {
            "/predict": "POST - Predict rockfall risk",
            "/mock-data": "GET - Get mock sensor data",
            "/health": "GET - API health check"
        }
    }))
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        model_status: if state.model_loaded() {
            "loaded"
        } else {
            "not_loaded"
        },
    })
}
