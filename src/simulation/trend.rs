//! Trend state for the telemetry simulator
//!
//! Slow-moving per-channel bias so consecutive readings drift smoothly
//! instead of jumping with every request. Offsets move at most once per
//! update interval and stay inside a hard band.

use chrono::{DateTime, Utc};
use rand::Rng;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum seconds between trend updates
pub const TREND_UPDATE_INTERVAL_SECS: i64 = 10;
/// Per-update drift step bound
pub const TREND_DRIFT_STEP: f64 = 0.005;
/// Hard bound on any trend offset
pub const TREND_OFFSET_BOUND: f64 = 0.02;

// ============================================================================
// TRACKED CHANNELS
// ============================================================================

/// Channels whose drift persists between readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedChannel {
    SlopeAngle,
    JointSpacing,
    RockStrength,
    WeatheringIndex,
    Rainfall24h,
    VibrationIntensity,
}

impl TrackedChannel {
    pub const ALL: [TrackedChannel; 6] = [
        TrackedChannel::SlopeAngle,
        TrackedChannel::JointSpacing,
        TrackedChannel::RockStrength,
        TrackedChannel::WeatheringIndex,
        TrackedChannel::Rainfall24h,
        TrackedChannel::VibrationIntensity,
    ];

    /// Schema name of the tracked channel
    pub fn name(&self) -> &'static str {
        match self {
            TrackedChannel::SlopeAngle => "slope_angle",
            TrackedChannel::JointSpacing => "joint_spacing",
            TrackedChannel::RockStrength => "rock_strength",
            TrackedChannel::WeatheringIndex => "weathering_index",
            TrackedChannel::Rainfall24h => "rainfall_24h",
            TrackedChannel::VibrationIntensity => "vibration_intensity",
        }
    }
}

/// Number of tracked channels
pub const TRACKED_COUNT: usize = TrackedChannel::ALL.len();

// ============================================================================
// TREND STATE
// ============================================================================

/// Per-channel drift offsets plus the instant they last moved.
#[derive(Debug, Clone)]
pub struct TrendState {
    offsets: [f64; TRACKED_COUNT],
    last_update: DateTime<Utc>,
}

impl TrendState {
    /// All-zero offsets anchored at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            offsets: [0.0; TRACKED_COUNT],
            last_update: now,
        }
    }

    /// Current offset of one tracked channel.
    pub fn offset(&self, channel: TrackedChannel) -> f64 {
        self.offsets[channel as usize]
    }

    /// All offsets in `TrackedChannel::ALL` order.
    pub fn offsets(&self) -> [f64; TRACKED_COUNT] {
        self.offsets
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// Drift every offset once the update interval has elapsed.
    /// Returns whether the offsets moved.
    pub fn advance_at<R: Rng + ?Sized>(&mut self, now: DateTime<Utc>, rng: &mut R) -> bool {
        let elapsed = (now - self.last_update).num_seconds();
        if elapsed < TREND_UPDATE_INTERVAL_SECS {
            return false;
        }

        for offset in self.offsets.iter_mut() {
            *offset += rng.gen_range(-TREND_DRIFT_STEP..=TREND_DRIFT_STEP);
            *offset = offset.clamp(-TREND_OFFSET_BOUND, TREND_OFFSET_BOUND);
        }
        self.last_update = now;
        true
    }
}

// ============================================================================
// TESTS
// ============================================================================
