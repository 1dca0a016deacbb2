//! Trained-model predictor
//!
//! Reproduces the training-time pipeline at request time: order the input
//! channels by the artifact layout, standardize, score each class linearly,
//! softmax, arg-max. Unlike the formula scorer this path is strict about its
//! input: every model column must be present.

use std::path::Path;

use chrono::Utc;
use ndarray::{Array1, Array2};

use super::artifact::ModelArtifact;
use super::{ModelError, MIN_SCALER_STD};
use crate::features::{round1, FeatureMap};
use crate::risk::{CategoryBreakdown, RiskAssessment, RiskCategory};

/// Risk-probability base per arg-max class, in severity order.
const CATEGORY_BASE_SCORE: [f64; 4] = [15.0, 40.0, 70.0, 90.0];
/// Scale applied to the winning probability's margin over 0.5.
const CONFIDENCE_MARGIN_SCALE: f64 = 20.0;

/// Serving wrapper around a validated artifact.
pub struct RockfallPredictor {
    artifact: ModelArtifact,
    weights: Array2<f64>,
    intercepts: Array1<f64>,
    scaler_mean: Array1<f64>,
    scaler_std: Array1<f64>,
}

impl RockfallPredictor {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        Self::from_artifact(ModelArtifact::load(path)?)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;

        let classes = artifact.risk_categories.len();
        let features = artifact.n_features;

        let mut weights = Array2::zeros((classes, features));
        for (class, row) in artifact.weights.iter().enumerate() {
            for (column, value) in row.iter().enumerate() {
                weights[[class, column]] = *value;
            }
        }

        let intercepts = Array1::from_vec(artifact.intercepts.clone());
        let scaler_mean = Array1::from_vec(artifact.scaler_mean.clone());
        let scaler_std = artifact
            .scaler_std
            .iter()
            .map(|s| s.max(MIN_SCALER_STD))
            .collect::<Array1<f64>>();

        Ok(Self {
            artifact,
            weights,
            intercepts,
            scaler_mean,
            scaler_std,
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn training_accuracy(&self) -> f64 {
        self.artifact.training_accuracy
    }

    /// Class probabilities in `risk_categories` order.
    pub fn class_probabilities(&self, features: &FeatureMap) -> Result<Array1<f64>, ModelError> {
        let mut input = Array1::zeros(self.artifact.n_features);
        for (index, column) in self.artifact.feature_columns.iter().enumerate() {
            input[index] = features
                .get(column)
                .ok_or_else(|| ModelError::MissingFeature(column.clone()))?;
        }

        let standardized = (&input - &self.scaler_mean) / &self.scaler_std;
        let logits = self.weights.dot(&standardized) + &self.intercepts;
        Ok(softmax(logits))
    }

    /// Full assessment of a feature map through the trained model.
    pub fn predict(&self, features: &FeatureMap) -> Result<RiskAssessment, ModelError> {
        let probabilities = self.class_probabilities(features)?;
        let (winner, max_probability) = argmax(&probabilities);

        let category = RiskCategory::from_index(winner).ok_or_else(|| {
            ModelError::Malformed(format!("class index {winner} has no category"))
        })?;

        let risk_probability = (CATEGORY_BASE_SCORE[winner]
            + (max_probability - 0.5) * CONFIDENCE_MARGIN_SCALE)
            .clamp(0.0, 100.0);

        Ok(RiskAssessment {
            risk_category: category,
            risk_probability: round1(risk_probability),
            confidence: round1(max_probability * 100.0),
            prediction_time: Utc::now(),
            category_probabilities: CategoryBreakdown {
                low: round1(probabilities[0] * 100.0),
                medium: round1(probabilities[1] * 100.0),
                high: round1(probabilities[2] * 100.0),
                critical: round1(probabilities[3] * 100.0),
            },
        })
    }

    /// Normalized mean absolute weight per column, most influential first.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let classes = self.weights.nrows().max(1);

        let mut scores: Vec<(String, f64)> = self
            .artifact
            .feature_columns
            .iter()
            .enumerate()
            .map(|(column, name)| {
                let mean_abs = self.weights.column(column).iter().map(|w| w.abs()).sum::<f64>()
                    / classes as f64;
                (name.clone(), mean_abs)
            })
            .collect();

        let total: f64 = scores.iter().map(|(_, score)| score).sum();
        if total > 0.0 {
            for (_, score) in scores.iter_mut() {
                *score /= total;
            }
        }

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores
    }
}

/// Numerically stable softmax.
fn softmax(logits: Array1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let mut exps = logits.mapv(|v| (v - max).exp());
    let sum = exps.sum();
    if sum > 0.0 {
        exps.mapv_inplace(|v| v / sum);
    }
    exps
}

fn argmax(values: &Array1<f64>) -> (usize, f64) {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (index, &value) in values.iter().enumerate() {
        if value > best_value {
            best = index;
            best_value = value;
        }
    }
    (best, best_value)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FEATURE_COLUMNS, FEATURE_COUNT};

    /// Identity scaler, all weights zero except a strong slope signal that
    /// pulls toward Critical and away from Low.
    fn slope_rule_artifact() -> ModelArtifact {
        let mut weights = vec![vec![0.0; FEATURE_COUNT]; 4];
        weights[0][0] = -2.0;
        weights[3][0] = 2.0;

        ModelArtifact {
            model_type: "multinomial_logistic_regression".to_string(),
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            risk_categories: RiskCategory::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            scaler_mean: vec![0.0; FEATURE_COUNT],
            scaler_std: vec![1.0; FEATURE_COUNT],
            weights,
            intercepts: vec![0.0; 4],
            training_accuracy: 0.9,
            trained_date: Utc::now(),
            n_samples: 100,
            n_features: FEATURE_COUNT,
        }
    }

    fn zeroed_features() -> FeatureMap {
        FEATURE_COLUMNS
            .iter()
            .map(|column| (column.to_string(), 0.0))
            .collect()
    }

    #[test]
    fn test_predict_requires_every_model_column() {
        let predictor = RockfallPredictor::from_artifact(slope_rule_artifact()).unwrap();
        let mut features = zeroed_features();
        features.0.remove("wind_speed");

        let err = predictor.predict(&features).unwrap_err();
        assert!(matches!(err, ModelError::MissingFeature(name) if name == "wind_speed"));
    }

    #[test]
    fn test_high_slope_lands_critical() {
        let predictor = RockfallPredictor::from_artifact(slope_rule_artifact()).unwrap();
        let mut features = zeroed_features();
        features.insert("slope_angle", 3.0);

        let result = predictor.predict(&features).unwrap();
        assert_eq!(result.risk_category, RiskCategory::Critical);
        assert!(result.risk_probability >= 90.0);
        assert!(result.confidence > 90.0);
    }

    #[test]
    fn test_breakdown_is_softmax_percentages() {
        let predictor = RockfallPredictor::from_artifact(slope_rule_artifact()).unwrap();
        let mut features = zeroed_features();
        features.insert("slope_angle", 1.5);

        let result = predictor.predict(&features).unwrap();
        let sum = result.category_probabilities.low
            + result.category_probabilities.medium
            + result.category_probabilities.high
            + result.category_probabilities.critical;
        assert!((sum - 100.0).abs() < 0.5, "breakdown sums to {sum}");
    }

    #[test]
    fn test_feature_importance_sorted_and_normalized() {
        let predictor = RockfallPredictor::from_artifact(slope_rule_artifact()).unwrap();
        let importance = predictor.feature_importance();

        assert_eq!(importance.len(), FEATURE_COUNT);
        assert_eq!(importance[0].0, "slope_angle");

        let total: f64 = importance.iter().map(|(_, score)| score).sum();
        assert!((total - 1.0).abs() < 1e-9);

        for pair in importance.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_scaler_std_floored_at_load() {
        let mut artifact = slope_rule_artifact();
        artifact.scaler_std[0] = 0.0;

        let predictor = RockfallPredictor::from_artifact(artifact).unwrap();
        let mut features = zeroed_features();
        features.insert("slope_angle", 1.0);

        // A zero std must not produce NaN or infinite probabilities.
        let probabilities = predictor.class_probabilities(&features).unwrap();
        assert!(probabilities.iter().all(|p| p.is_finite()));
    }
}
