//! Formula-based risk scorer
//!
//! Deterministic weighted scoring over four normalized sub-factors, bucketed
//! into the ordered categories with a piecewise-linear probability mapping.
//! Jitter comes from an injected `Rng` so callers can make results
//! reproducible.

use chrono::Utc;
use rand::Rng;

use super::types::{CategoryBreakdown, RiskAssessment, RiskCategory};
use crate::features::{
    round1, FeatureMap, DEFAULT_JOINT_SPACING, DEFAULT_RAINFALL_24H, DEFAULT_SLOPE_ANGLE,
    DEFAULT_VIBRATION_INTENSITY, DEFAULT_WEATHERING_INDEX,
};

// ============================================================================
// SCORING CONSTANTS
// ============================================================================

/// Slope sub-factor weight
const SLOPE_WEIGHT: f64 = 0.30;
/// Joint-spacing sub-factor weight
const JOINT_WEIGHT: f64 = 0.25;
/// Weather sub-factor weight (rainfall + weathering)
const WEATHER_WEIGHT: f64 = 0.25;
/// Vibration sub-factor weight
const VIBRATION_WEIGHT: f64 = 0.20;

/// Per-assessment risk jitter bound
const RISK_JITTER: f64 = 0.02;
/// Final probability jitter bound in percentage points
const PROBABILITY_JITTER: f64 = 1.5;
const PROBABILITY_MIN: f64 = 5.0;
const PROBABILITY_MAX: f64 = 95.0;

/// Confidence is stable around 87% and independent of the input
const CONFIDENCE_BASE: f64 = 87.0;
const CONFIDENCE_JITTER: f64 = 3.0;
const CONFIDENCE_MIN: f64 = 75.0;
const CONFIDENCE_MAX: f64 = 95.0;

// ============================================================================
// SCORING
// ============================================================================

/// Composite risk score in [0, 1], jitter-free.
///
/// Missing channels fall back to the documented defaults. `joint_spacing`
/// only appears divided by 3 with a floor at 0, so small spacings cannot
/// blow the score up. A NaN channel is squashed by its factor clamp
/// (`min`/`max` return the non-NaN operand); only infinities reach the
/// non-finite fallback in `assess`.
pub fn composite_score(features: &FeatureMap) -> f64 {
    let slope_factor = (features.get_or("slope_angle", DEFAULT_SLOPE_ANGLE) / 90.0).min(1.0);
    let joint_factor =
        (1.0 - features.get_or("joint_spacing", DEFAULT_JOINT_SPACING) / 3.0).max(0.0);
    let weather_factor = ((features.get_or("rainfall_24h", DEFAULT_RAINFALL_24H)
        + features.get_or("weathering_index", DEFAULT_WEATHERING_INDEX))
        / 20.0)
        .min(1.0);
    let vibration_factor =
        (features.get_or("vibration_intensity", DEFAULT_VIBRATION_INTENSITY) / 5.0).min(1.0);

    slope_factor * SLOPE_WEIGHT
        + joint_factor * JOINT_WEIGHT
        + weather_factor * WEATHER_WEIGHT
        + vibration_factor * VIBRATION_WEIGHT
}

/// Map a risk score to its category and probability percentage.
///
/// The mapping is monotonic within each bucket but jumps at the boundaries
/// (22.5 -> 30, 40 -> 55, 62.5 -> 70). The jumps are part of the contract.
pub fn categorize(risk: f64) -> (RiskCategory, f64) {
    if risk < 0.3 {
        (RiskCategory::Low, 15.0 + risk * 25.0)
    } else if risk < 0.5 {
        (RiskCategory::Medium, 30.0 + (risk - 0.3) * 50.0)
    } else if risk < 0.7 {
        (RiskCategory::High, 55.0 + (risk - 0.5) * 37.5)
    } else {
        (RiskCategory::Critical, 70.0 + (risk - 0.7) * 50.0)
    }
}

/// Full assessment of a feature map. Never fails: a non-finite score falls
/// back to the fixed default assessment instead of propagating.
pub fn assess<R: Rng + ?Sized>(features: &FeatureMap, rng: &mut R) -> RiskAssessment {
    let mut risk = composite_score(features);
    risk += rng.gen_range(-RISK_JITTER..=RISK_JITTER);

    if !risk.is_finite() {
        return fallback_assessment();
    }
    risk = risk.clamp(0.0, 1.0);

    let (category, probability) = categorize(risk);
    let probability = (probability + rng.gen_range(-PROBABILITY_JITTER..=PROBABILITY_JITTER))
        .clamp(PROBABILITY_MIN, PROBABILITY_MAX);
    let confidence = (CONFIDENCE_BASE + rng.gen_range(-CONFIDENCE_JITTER..=CONFIDENCE_JITTER))
        .clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);

    RiskAssessment {
        risk_category: category,
        risk_probability: round1(probability),
        confidence: round1(confidence),
        prediction_time: Utc::now(),
        category_probabilities: breakdown(risk),
    }
}

/// Fixed safe default returned when scoring hits a numeric fault.
pub fn fallback_assessment() -> RiskAssessment {
    RiskAssessment {
        risk_category: RiskCategory::Medium,
        risk_probability: 35.0,
        confidence: 85.0,
        prediction_time: Utc::now(),
        category_probabilities: CategoryBreakdown {
            low: 25.0,
            medium: 45.0,
            high: 25.0,
            critical: 5.0,
        },
    }
}

/// Four independent smoothed curves of the risk score, floored at 0.
/// Intentionally not normalized to sum to 100.
fn breakdown(risk: f64) -> CategoryBreakdown {
    CategoryBreakdown {
        low: round1((35.0 - risk * 35.0).max(0.0)),
        medium: round1((45.0 - (risk - 0.4).abs() * 90.0).max(0.0)),
        high: round1((35.0 - (risk - 0.6).abs() * 70.0).max(0.0)),
        critical: round1((risk * 30.0 - 15.0).max(0.0)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
