//! Trained risk classifier
//!
//! Companion to the formula scorer: a multinomial logistic regression over
//! the full channel layout, trained offline on synthetic data (`trainer`),
//! stored as a transparent JSON bundle (`artifact`), and served strictly at
//! request time (`predictor`).

mod artifact;
mod predictor;
mod trainer;

pub use artifact::{ModelArtifact, ModelInfo};
pub use predictor::RockfallPredictor;
pub use trainer::{
    train, ClassReport, SampleRecord, TrainingOptions, TrainingOutcome, TrainingReport,
};

use thiserror::Error;

/// Floor for standardization denominators, applied at fit and load time.
pub(crate) const MIN_SCALER_STD: f64 = 1e-8;

/// Errors from the trained-model path.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing required feature: {0}")]
    MissingFeature(String),

    #[error("malformed artifact: {0}")]
    Malformed(String),

    #[error("invalid training options: {0}")]
    InvalidOptions(String),
}
