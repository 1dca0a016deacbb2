//! Synthetic-data trainer
//!
//! Fabricates a labeled dataset from per-channel distributions, fits a
//! standard scaler on the training split, and trains a multinomial logistic
//! regression by full-batch gradient descent. Everything is seeded, so a
//! given set of options always yields the same artifact.

use chrono::Utc;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Exp, Normal, Poisson};
use serde::{Deserialize, Serialize};

use super::artifact::ModelArtifact;
use super::{ModelError, MIN_SCALER_STD};
use crate::features::{round1, FeatureMap, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::risk::RiskCategory;

// ============================================================================
// OPTIONS
// ============================================================================

/// Fewest samples that still leave both splits meaningfully populated.
const MIN_TRAINING_SAMPLES: usize = 40;
/// Records exported to `sample_data.json`.
const SAMPLE_RECORD_COUNT: usize = 100;

#[derive(Debug, Clone)]
pub struct TrainingOptions {
    /// Synthetic samples to fabricate
    pub n_samples: usize,
    /// Seed for dataset fabrication and the split shuffle
    pub seed: u64,
    /// Held-out fraction used for the accuracy report
    pub test_fraction: f64,
    /// Gradient-descent step size
    pub learning_rate: f64,
    /// Full-batch passes over the training split
    pub epochs: usize,
    /// L2 weight penalty
    pub l2_penalty: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            n_samples: 5000,
            seed: 42,
            test_fraction: 0.2,
            learning_rate: 0.2,
            epochs: 500,
            l2_penalty: 1e-4,
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Evaluation of the held-out split.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub classes: Vec<ClassReport>,
}

/// Per-class precision/recall on the held-out split.
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub category: RiskCategory,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Labeled record exported to `sample_data.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    #[serde(flatten)]
    pub features: FeatureMap,
    pub risk_category: RiskCategory,
    pub risk_probability: f64,
}

/// Everything one training run produces.
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub report: TrainingReport,
    pub samples: Vec<SampleRecord>,
}

// ============================================================================
// TRAINING
// ============================================================================

pub fn train(options: &TrainingOptions) -> Result<TrainingOutcome, ModelError> {
    if options.n_samples < MIN_TRAINING_SAMPLES {
        return Err(ModelError::InvalidOptions(format!(
            "n_samples must be at least {MIN_TRAINING_SAMPLES}"
        )));
    }
    if !(0.05..=0.5).contains(&options.test_fraction) {
        return Err(ModelError::InvalidOptions(
            "test_fraction must be within [0.05, 0.5]".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let dataset = synthesize_dataset(options.n_samples, &mut rng);

    // Shuffled train/test split
    let mut indices: Vec<usize> = (0..options.n_samples).collect();
    indices.shuffle(&mut rng);
    let n_test = ((options.n_samples as f64) * options.test_fraction).round() as usize;
    let n_train = options.n_samples - n_test;
    let (train_idx, test_idx) = indices.split_at(n_train);

    let x_train_raw = dataset.features.select(Axis(0), train_idx);
    let x_test_raw = dataset.features.select(Axis(0), test_idx);
    let y_train: Vec<usize> = train_idx.iter().map(|&i| dataset.labels[i]).collect();
    let y_test: Vec<usize> = test_idx.iter().map(|&i| dataset.labels[i]).collect();

    let scaler = StandardScaler::fit(&x_train_raw);
    let x_train = scaler.transform(&x_train_raw);
    let x_test = scaler.transform(&x_test_raw);

    let (weights, intercepts) = fit_softmax_regression(&x_train, &y_train, options);

    let predicted = predict_classes(&x_test, &weights, &intercepts);
    let correct = predicted
        .iter()
        .zip(&y_test)
        .filter(|(p, a)| p == a)
        .count();
    let accuracy = if y_test.is_empty() {
        0.0
    } else {
        correct as f64 / y_test.len() as f64
    };
    let classes = classification_report(&y_test, &predicted);

    let artifact = ModelArtifact {
        model_type: "multinomial_logistic_regression".to_string(),
        feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        risk_categories: RiskCategory::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        scaler_mean: scaler.mean.to_vec(),
        scaler_std: scaler.std.to_vec(),
        weights: weights.rows().into_iter().map(|row| row.to_vec()).collect(),
        intercepts: intercepts.to_vec(),
        training_accuracy: accuracy,
        trained_date: Utc::now(),
        n_samples: options.n_samples,
        n_features: FEATURE_COUNT,
    };

    let samples = sample_records(&dataset, SAMPLE_RECORD_COUNT, &mut rng);

    Ok(TrainingOutcome {
        artifact,
        report: TrainingReport {
            accuracy,
            n_train,
            n_test,
            classes,
        },
        samples,
    })
}

// ============================================================================
// DATASET FABRICATION
// ============================================================================

struct Dataset {
    /// `[n_samples, FEATURE_COUNT]` in `FEATURE_COLUMNS` order
    features: Array2<f64>,
    /// Class index per sample
    labels: Vec<usize>,
    /// Bucket probability per sample
    probabilities: Vec<f64>,
}

struct ChannelDistributions {
    slope_angle: Normal<f64>,
    joint_spacing: Exp<f64>,
    rock_strength: Normal<f64>,
    rainfall_24h: Exp<f64>,
    rainfall_7d: Exp<f64>,
    temperature_variation: Normal<f64>,
    freeze_thaw_cycles: Poisson<f64>,
    wind_speed: Exp<f64>,
    vibration_intensity: Exp<f64>,
    excavation_height: Normal<f64>,
    previous_rockfall_30d: Poisson<f64>,
    maintenance_days_since: Exp<f64>,
    label_noise: Normal<f64>,
}

impl ChannelDistributions {
    fn new() -> Self {
        Self {
            slope_angle: normal(45.0, 15.0),
            joint_spacing: exponential(0.5),
            rock_strength: normal(50.0, 20.0),
            rainfall_24h: exponential(2.0),
            rainfall_7d: exponential(10.0),
            temperature_variation: normal(15.0, 8.0),
            freeze_thaw_cycles: poisson(2.0),
            wind_speed: exponential(3.0),
            vibration_intensity: exponential(1.0),
            excavation_height: normal(25.0, 10.0),
            previous_rockfall_30d: poisson(1.0),
            maintenance_days_since: exponential(15.0),
            label_noise: normal(0.0, 0.1),
        }
    }
}

// Parameters below are compile-time constants, construction cannot fail.

fn normal(mean: f64, std_dev: f64) -> Normal<f64> {
    Normal::new(mean, std_dev).expect("valid normal parameters")
}

/// Exponential with the given mean.
fn exponential(mean: f64) -> Exp<f64> {
    Exp::new(1.0 / mean).expect("valid exponential rate")
}

fn poisson(mean: f64) -> Poisson<f64> {
    Poisson::new(mean).expect("valid poisson mean")
}

fn synthesize_dataset<R: Rng + ?Sized>(n_samples: usize, rng: &mut R) -> Dataset {
    let dists = ChannelDistributions::new();

    let mut features = Array2::zeros((n_samples, FEATURE_COUNT));
    let mut labels = Vec::with_capacity(n_samples);
    let mut probabilities = Vec::with_capacity(n_samples);

    for row in 0..n_samples {
        let slope_angle = rng.sample(dists.slope_angle).clamp(10.0, 90.0);
        let joint_spacing = rng.sample(dists.joint_spacing).clamp(0.1, 5.0);
        let joint_orientation = rng.gen_range(0.0..360.0);
        let rock_strength = rng.sample(dists.rock_strength).clamp(10.0, 100.0);
        let weathering_index = rng.gen_range(0.0..10.0);
        let rainfall_24h = rng.sample(dists.rainfall_24h);
        let rainfall_7d = rng.sample(dists.rainfall_7d);
        let temperature_variation = rng.sample(dists.temperature_variation);
        let freeze_thaw_cycles = rng.sample(dists.freeze_thaw_cycles);
        let wind_speed = rng.sample(dists.wind_speed);
        let vibration_intensity = rng.sample(dists.vibration_intensity);
        let blast_distance = rng.gen_range(50.0..500.0);
        let excavation_height = rng.sample(dists.excavation_height).clamp(5.0, 100.0);
        let support_density = rng.gen_range(0.0..1.0);
        let previous_rockfall_30d = rng.sample(dists.previous_rockfall_30d);
        let maintenance_days_since = rng.sample(dists.maintenance_days_since);

        // FEATURE_COLUMNS order
        let values = [
            slope_angle,
            joint_spacing,
            joint_orientation,
            rock_strength,
            weathering_index,
            rainfall_24h,
            rainfall_7d,
            temperature_variation,
            freeze_thaw_cycles,
            wind_speed,
            vibration_intensity,
            blast_distance,
            excavation_height,
            support_density,
            previous_rockfall_30d,
            maintenance_days_since,
        ];
        for (column, value) in values.iter().enumerate() {
            features[[row, column]] = *value;
        }

        // Engineered labeling rule standing in for expert assessments. Its
        // weights differ from the serving formula on purpose.
        let raw_score = (slope_angle / 90.0) * 0.25
            + (1.0 / (joint_spacing + 0.1)) * 0.2
            + ((10.0 - rock_strength) / 100.0) * 0.2
            + (weathering_index / 10.0) * 0.15
            + (rainfall_24h / 20.0) * 0.1
            + (vibration_intensity / 5.0) * 0.1;
        let score = (raw_score + rng.sample(dists.label_noise)).clamp(0.0, 1.0);

        let (label, probability) = label_for_score(score);
        labels.push(label);
        probabilities.push(probability);
    }

    Dataset {
        features,
        labels,
        probabilities,
    }
}

/// Class index plus a probability percentage linear within the bucket.
fn label_for_score(score: f64) -> (usize, f64) {
    if score < 0.25 {
        (0, score * 25.0)
    } else if score < 0.5 {
        (1, 25.0 + (score - 0.25) * 100.0)
    } else if score < 0.75 {
        (2, 50.0 + (score - 0.5) * 100.0)
    } else {
        (3, 75.0 + (score - 0.75) * 100.0)
    }
}

fn sample_records<R: Rng + ?Sized>(dataset: &Dataset, count: usize, rng: &mut R) -> Vec<SampleRecord> {
    let n = dataset.labels.len();
    let picks = rand::seq::index::sample(rng, n, count.min(n));

    picks
        .into_iter()
        .map(|row| {
            let features: FeatureMap = FEATURE_COLUMNS
                .iter()
                .enumerate()
                .map(|(column, name)| (name.to_string(), dataset.features[[row, column]]))
                .collect();

            SampleRecord {
                features,
                risk_category: RiskCategory::ALL[dataset.labels[row]],
                risk_probability: round1(dataset.probabilities[row]),
            }
        })
        .collect()
}

// ============================================================================
// FITTING
// ============================================================================

struct StandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl StandardScaler {
    fn fit(matrix: &Array2<f64>) -> Self {
        let mean = matrix
            .mean_axis(Axis(0))
            .expect("training split is non-empty");
        let std = matrix
            .std_axis(Axis(0), 0.0)
            .mapv(|s| s.max(MIN_SCALER_STD));
        Self { mean, std }
    }

    fn transform(&self, matrix: &Array2<f64>) -> Array2<f64> {
        (matrix - &self.mean) / &self.std
    }
}

fn fit_softmax_regression(
    x: &Array2<f64>,
    labels: &[usize],
    options: &TrainingOptions,
) -> (Array2<f64>, Array1<f64>) {
    let n = x.nrows();
    let classes = RiskCategory::ALL.len();

    let mut one_hot = Array2::zeros((n, classes));
    for (row, &label) in labels.iter().enumerate() {
        one_hot[[row, label]] = 1.0;
    }

    let mut weights = Array2::zeros((classes, x.ncols()));
    let mut intercepts = Array1::zeros(classes);

    for _ in 0..options.epochs {
        let logits = x.dot(&weights.t()) + &intercepts;
        let probabilities = softmax_rows(logits);
        let error = probabilities - &one_hot;

        let mut gradient_w = error.t().dot(x) / n as f64;
        gradient_w.scaled_add(options.l2_penalty, &weights);
        let gradient_b = error.sum_axis(Axis(0)) / n as f64;

        weights.scaled_add(-options.learning_rate, &gradient_w);
        intercepts.scaled_add(-options.learning_rate, &gradient_b);
    }

    (weights, intercepts)
}

fn softmax_rows(mut logits: Array2<f64>) -> Array2<f64> {
    for mut row in logits.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
    logits
}

fn predict_classes(x: &Array2<f64>, weights: &Array2<f64>, intercepts: &Array1<f64>) -> Vec<usize> {
    let logits = x.dot(&weights.t()) + intercepts;
    logits
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            let mut best_value = f64::NEG_INFINITY;
            for (index, &value) in row.iter().enumerate() {
                if value > best_value {
                    best = index;
                    best_value = value;
                }
            }
            best
        })
        .collect()
}

fn classification_report(actual: &[usize], predicted: &[usize]) -> Vec<ClassReport> {
    RiskCategory::ALL
        .iter()
        .enumerate()
        .map(|(class, &category)| {
            let mut true_positives = 0usize;
            let mut false_positives = 0usize;
            let mut false_negatives = 0usize;

            for (&a, &p) in actual.iter().zip(predicted) {
                if p == class && a == class {
                    true_positives += 1;
                } else if p == class {
                    false_positives += 1;
                } else if a == class {
                    false_negatives += 1;
                }
            }

            let support = true_positives + false_negatives;
            let precision = ratio(true_positives, true_positives + false_positives);
            let recall = ratio(true_positives, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassReport {
                category,
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RockfallPredictor;

    fn quick_options() -> TrainingOptions {
        TrainingOptions {
            n_samples: 500,
            epochs: 300,
            ..TrainingOptions::default()
        }
    }

    fn feature_map(overrides: &[(&str, f64)]) -> FeatureMap {
        let mut map: FeatureMap = FEATURE_COLUMNS
            .iter()
            .map(|column| (column.to_string(), 1.0))
            .collect();
        for (name, value) in overrides {
            map.insert(*name, *value);
        }
        map
    }

    #[test]
    fn test_training_produces_consistent_artifact() {
        let outcome = train(&quick_options()).unwrap();

        outcome.artifact.validate().unwrap();
        assert_eq!(outcome.artifact.n_features, FEATURE_COUNT);
        assert_eq!(outcome.artifact.weights.len(), RiskCategory::ALL.len());
        assert_eq!(outcome.report.n_train + outcome.report.n_test, 500);
        assert!(
            outcome.report.accuracy > 0.5,
            "accuracy {} too low",
            outcome.report.accuracy
        );

        assert_eq!(outcome.samples.len(), 100);
        for sample in &outcome.samples {
            assert!(sample.features.missing_columns().is_empty());
            assert!((0.0..=100.0).contains(&sample.risk_probability));
        }
    }

    #[test]
    fn test_training_is_seed_deterministic() {
        let a = train(&quick_options()).unwrap();
        let b = train(&quick_options()).unwrap();

        assert_eq!(a.artifact.weights, b.artifact.weights);
        assert_eq!(a.artifact.intercepts, b.artifact.intercepts);
        assert_eq!(a.report.accuracy, b.report.accuracy);
    }

    #[test]
    fn test_trained_model_orders_extreme_above_benign() {
        let outcome = train(&quick_options()).unwrap();
        let predictor = RockfallPredictor::from_artifact(outcome.artifact).unwrap();

        let risky = feature_map(&[
            ("slope_angle", 88.0),
            ("joint_spacing", 0.12),
            ("rock_strength", 12.0),
            ("weathering_index", 9.5),
            ("rainfall_24h", 18.0),
            ("rainfall_7d", 120.0),
            ("vibration_intensity", 4.8),
        ]);
        let calm = feature_map(&[
            ("slope_angle", 12.0),
            ("joint_spacing", 4.8),
            ("rock_strength", 98.0),
            ("weathering_index", 0.2),
            ("rainfall_24h", 0.0),
            ("rainfall_7d", 0.0),
            ("vibration_intensity", 0.05),
        ]);

        let risky_probs = predictor.class_probabilities(&risky).unwrap();
        let calm_probs = predictor.class_probabilities(&calm).unwrap();
        assert!(risky_probs[3] > calm_probs[3], "critical mass should rise");
        assert!(calm_probs[0] > risky_probs[0], "low mass should fall");

        let risky_assessment = predictor.predict(&risky).unwrap();
        let calm_assessment = predictor.predict(&calm).unwrap();
        assert!(risky_assessment.risk_category > calm_assessment.risk_category);
    }

    #[test]
    fn test_rejects_degenerate_options() {
        let too_small = TrainingOptions {
            n_samples: 5,
            ..TrainingOptions::default()
        };
        assert!(matches!(
            train(&too_small),
            Err(ModelError::InvalidOptions(_))
        ));

        let bad_split = TrainingOptions {
            test_fraction: 0.9,
            ..TrainingOptions::default()
        };
        assert!(matches!(
            train(&bad_split),
            Err(ModelError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_label_rule_buckets() {
        assert_eq!(label_for_score(0.1), (0, 2.5));
        assert_eq!(label_for_score(0.3).0, 1);
        assert_eq!(label_for_score(0.6).0, 2);
        assert_eq!(label_for_score(0.9).0, 3);

        // The probability ramp jumps at the Low/Medium boundary and is
        // continuous at the upper two.
        let (_, below) = label_for_score(0.25 - 1e-9);
        let (_, above) = label_for_score(0.25);
        assert!((below - 6.25).abs() < 1e-6);
        assert_eq!(above, 25.0);

        let (_, below) = label_for_score(0.5 - 1e-9);
        let (_, above) = label_for_score(0.5);
        assert!((below - above).abs() < 1e-6);

        let (_, below) = label_for_score(0.75 - 1e-9);
        let (_, above) = label_for_score(0.75);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn test_classification_report_counts() {
        let actual = vec![0, 0, 1, 2, 3, 3];
        let predicted = vec![0, 1, 1, 2, 3, 2];
        let report = classification_report(&actual, &predicted);

        assert_eq!(report[0].support, 2);
        assert_eq!(report[0].recall, 0.5);
        assert_eq!(report[0].precision, 1.0);
        assert_eq!(report[3].support, 2);
        assert_eq!(report[3].recall, 0.5);
    }
}
