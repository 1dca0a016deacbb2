//! Model artifact serialization
//!
//! The trained classifier travels as one JSON bundle: column order, class
//! order, scaler statistics, per-class weights and intercepts, plus training
//! metadata. The bundle is self-describing, so the predictor follows the
//! artifact's layout rather than assuming the compiled-in one.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::risk::RiskCategory;

/// Serialized classifier bundle (`rockfall_model.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    /// Column names in model input order
    pub feature_columns: Vec<String>,
    /// Class names in severity order
    pub risk_categories: Vec<String>,
    /// Per-column standardization mean
    pub scaler_mean: Vec<f64>,
    /// Per-column standardization std
    pub scaler_std: Vec<f64>,
    /// One weight row per class, `risk_categories` order
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    pub training_accuracy: f64,
    pub trained_date: DateTime<Utc>,
    pub n_samples: usize,
    pub n_features: usize,
}

impl ModelArtifact {
    /// Load and validate a bundle from disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)?;
        let artifact: Self = serde_json::from_str(&raw)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Structural consistency checks before the predictor trusts the bundle.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_columns.len() != self.n_features {
            return Err(ModelError::Malformed(format!(
                "feature_columns has {} entries but n_features is {}",
                self.feature_columns.len(),
                self.n_features
            )));
        }

        if self.scaler_mean.len() != self.n_features || self.scaler_std.len() != self.n_features {
            return Err(ModelError::Malformed(
                "scaler statistics do not match n_features".to_string(),
            ));
        }

        // The service only understands the four fixed categories, in order.
        let expected: Vec<&str> = RiskCategory::ALL.iter().map(|c| c.as_str()).collect();
        if self.risk_categories != expected {
            return Err(ModelError::Malformed(format!(
                "unexpected risk categories {:?}",
                self.risk_categories
            )));
        }

        if self.weights.len() != self.risk_categories.len()
            || self.intercepts.len() != self.risk_categories.len()
        {
            return Err(ModelError::Malformed(
                "weight rows do not match risk_categories".to_string(),
            ));
        }

        if self.weights.iter().any(|row| row.len() != self.n_features) {
            return Err(ModelError::Malformed(
                "weight row width does not match n_features".to_string(),
            ));
        }

        Ok(())
    }

    /// Metadata mirror written beside the model (`model_info.json`).
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_type: self.model_type.clone(),
            feature_columns: self.feature_columns.clone(),
            risk_categories: self.risk_categories.clone(),
            training_accuracy: self.training_accuracy,
            trained_date: self.trained_date,
            n_samples: self.n_samples,
            n_features: self.n_features,
        }
    }
}

/// Weight-free metadata companion for dashboards and tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub feature_columns: Vec<String>,
    pub risk_categories: Vec<String>,
    pub training_accuracy: f64,
    pub trained_date: DateTime<Utc>,
    pub n_samples: usize,
    pub n_features: usize,
}

impl ModelInfo {
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
