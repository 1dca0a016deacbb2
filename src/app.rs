//! Application state and router assembly

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use parking_lot::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::AppResult;
use crate::features::FeatureMap;
use crate::handlers;
use crate::model::RockfallPredictor;
use crate::risk::{self, RiskAssessment};
use crate::simulation::TelemetrySimulator;

/// Wire-contract version reported by the status and prediction endpoints
pub const API_VERSION: &str = "1.0.0";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub simulator: Arc<Mutex<TelemetrySimulator>>,
    pub predictor: Option<Arc<RockfallPredictor>>,
}

impl AppState {
    /// Build state from configuration. A model artifact that fails to load
    /// downgrades to the formula scorer instead of aborting startup.
    pub fn new(config: Config) -> Self {
        let predictor = config.model_path.as_ref().and_then(|path| {
            match RockfallPredictor::load(path) {
                Ok(predictor) => {
                    tracing::info!(
                        "Model loaded from {} (training accuracy {:.3})",
                        path.display(),
                        predictor.training_accuracy()
                    );
                    Some(Arc::new(predictor))
                }
                Err(err) => {
                    tracing::warn!(
                        "Could not load model from {}: {} - falling back to formula scorer",
                        path.display(),
                        err
                    );
                    None
                }
            }
        });

        let simulator = TelemetrySimulator::new(config.telemetry_seed);

        Self {
            config,
            simulator: Arc::new(Mutex::new(simulator)),
            predictor,
        }
    }

    /// Whether the trained model is serving predictions
    pub fn model_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    /// Score a feature map through the active backend.
    pub fn assess(&self, features: &FeatureMap) -> AppResult<RiskAssessment> {
        match &self.predictor {
            Some(predictor) => Ok(predictor.predict(features)?),
            None => Ok(risk::assess(features, &mut rand::thread_rng())),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Development stays wide open; production pins the allow-list.
    let cors = if state.config.is_production() {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/", get(handlers::status::index))
        .route("/health", get(handlers::status::health))
        .route("/predict", post(handlers::predict::predict))
        .route("/mock-data", get(handlers::monitoring::mock_data))
        .route("/historical-data", get(handlers::historical::historical_data))
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
