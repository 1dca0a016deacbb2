//! Rockfall risk estimation service
//!
//! HTTP API for open-pit mine slope monitoring. Two interchangeable scoring
//! backends sit behind one assessment shape: a deterministic weighted
//! formula over a handful of channels, and an optional trained classifier
//! over the full sixteen-channel layout. A telemetry simulator feeds the
//! live dashboard endpoints until real instrumentation exists.

pub mod app;
pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod model;
pub mod risk;
pub mod simulation;

pub use app::{create_router, AppState};
pub use error::{AppError, AppResult};
