//! Rockfall Prediction API Server
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ROCKFALL API                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌────────────────────┐  │
//! │  │  HTTP     │  │  Risk Scoring │  │  Telemetry         │  │
//! │  │  Gateway  │  │  Formula /    │  │  Simulator         │  │
//! │  │  (Axum)   │  │  Trained LR   │  │  (seeded RNG)      │  │
//! │  └─────┬─────┘  └───────┬───────┘  └─────────┬──────────┘  │
//! │        └────────────────┼────────────────────┘              │
//! │                         ▼                                   │
//! │                ┌─────────────────┐                          │
//! │                │ rockfall_model  │  (optional JSON bundle)  │
//! │                └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rockfall_api::config::Config;
use rockfall_api::{create_router, AppState};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "rockfall_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Rockfall Prediction API starting...");
    tracing::info!("Environment: {}", config.environment);

    // Build application state
    let state = AppState::new(config.clone());
    if state.model_loaded() {
        tracing::info!("Scoring backend: trained model");
    } else {
        tracing::info!("Scoring backend: formula scorer");
    }

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);
    tracing::info!("   GET  /                - API status");
    tracing::info!("   GET  /health          - Health check");
    tracing::info!("   POST /predict         - Rockfall prediction");
    tracing::info!("   GET  /mock-data       - Live sensor simulation");
    tracing::info!("   GET  /historical-data - Historical trends");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
