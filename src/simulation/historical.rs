//! Historical trend fabrication
//!
//! Builds a week of hourly risk history on demand: a slow upward trend, a
//! daily cycle, and bounded noise. Only the most recent window is returned,
//! together with summary statistics for the dashboard header.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::features::{round1, round2};
use crate::risk::RiskCategory;

// ============================================================================
// SERIES CONSTANTS
// ============================================================================

/// Hours fabricated per series (one week)
pub const SERIES_HOURS: usize = 168;
/// Hours returned to the caller (most recent two days)
pub const WINDOW_HOURS: usize = 48;

const BASE_RISK: f64 = 35.0;
const BASE_SLOPE: f64 = 45.0;
const BASE_RAINFALL: f64 = 2.0;
const BASE_VIBRATION: f64 = 2.0;

/// Probability above which a point counts as a high-risk alert
const HIGH_RISK_THRESHOLD: f64 = 60.0;
/// Endpoint delta below which the summary calls the series stable
const STABLE_TREND_TOLERANCE: f64 = 10.0;

// ============================================================================
// TYPES
// ============================================================================

/// One fabricated hourly observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub timestamp: DateTime<Utc>,
    pub risk_probability: f64,
    pub risk_category: RiskCategory,
    pub slope_angle: f64,
    pub rainfall_24h: f64,
    pub vibration_intensity: f64,
}

/// Summary statistics over the returned window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    pub total_points: usize,
    pub avg_risk: f64,
    pub high_risk_alerts: usize,
    pub trend: String,
}

/// Window of recent points plus their summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub data: Vec<HistoricalPoint>,
    pub summary: HistoricalSummary,
}

// ============================================================================
// GENERATION
// ============================================================================

/// Fabricate a full week ending at `now` and return the recent window.
pub fn generate_series_at<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> HistoricalSeries {
    let base_time = now - Duration::days(7);
    let mut points = Vec::with_capacity(SERIES_HOURS);

    for hour in 0..SERIES_HOURS {
        let timestamp = base_time + Duration::hours(hour as i64);
        let trend_factor = hour as f64 / SERIES_HOURS as f64;
        let daily_cycle = 0.5 * (2.0 * std::f64::consts::PI * hour as f64 / 24.0).sin();

        let risk_probability = (BASE_RISK
            + trend_factor * 15.0
            + daily_cycle * 5.0
            + rng.gen_range(-3.0..=3.0))
        .clamp(10.0, 85.0);

        let slope_angle = BASE_SLOPE + trend_factor * 5.0 + rng.gen_range(-1.0..=1.0);
        let rainfall_24h = (BASE_RAINFALL
            + trend_factor * 3.0
            + daily_cycle * 2.0
            + rng.gen_range(-0.5..=0.5))
        .max(0.0);
        let vibration_intensity = (BASE_VIBRATION
            + trend_factor * 1.0
            + daily_cycle * 0.5
            + rng.gen_range(-0.2..=0.2))
        .max(0.1);

        points.push(HistoricalPoint {
            timestamp,
            risk_probability: round1(risk_probability),
            risk_category: bucket_probability(risk_probability),
            slope_angle: round1(slope_angle),
            rainfall_24h: round1(rainfall_24h),
            vibration_intensity: round2(vibration_intensity),
        });
    }

    let recent = points.split_off(SERIES_HOURS - WINDOW_HOURS);
    let summary = summarize(&recent);

    HistoricalSeries {
        data: recent,
        summary,
    }
}

/// Coarse probability-percentage bucketing for the history chart. The
/// thresholds differ from the scorer's risk-score buckets on purpose.
fn bucket_probability(probability: f64) -> RiskCategory {
    if probability < 25.0 {
        RiskCategory::Low
    } else if probability < 50.0 {
        RiskCategory::Medium
    } else if probability < 70.0 {
        RiskCategory::High
    } else {
        RiskCategory::Critical
    }
}

fn summarize(points: &[HistoricalPoint]) -> HistoricalSummary {
    if points.is_empty() {
        return HistoricalSummary {
            total_points: 0,
            avg_risk: 0.0,
            high_risk_alerts: 0,
            trend: "stable".to_string(),
        };
    }

    let total_points = points.len();
    let avg = points.iter().map(|p| p.risk_probability).sum::<f64>() / total_points as f64;
    let high_risk_alerts = points
        .iter()
        .filter(|p| p.risk_probability > HIGH_RISK_THRESHOLD)
        .count();

    let first = points[0].risk_probability;
    let last = points[total_points - 1].risk_probability;
    let trend = if (last - first).abs() < STABLE_TREND_TOLERANCE {
        "stable"
    } else {
        "increasing"
    };

    HistoricalSummary {
        total_points,
        avg_risk: round1(avg),
        high_risk_alerts,
        trend: trend.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
