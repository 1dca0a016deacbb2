//! Synthetic sensor reading generator
//!
//! Produces smoothly varying mock telemetry for the live dashboard: a slow
//! trend bias from `TrendState`, small per-call jitter, hard physical clamps
//! per channel, and a sinusoidal daily temperature cycle. The simulator owns
//! a seedable RNG so demo streams can be made reproducible.

use chrono::{DateTime, Timelike, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::trend::{TrackedChannel, TrendState};
use crate::features::{round1, round2, FeatureMap};

// ============================================================================
// CHANNEL CONSTANTS
// ============================================================================

/// Trend-to-channel amplification factors. A trend offset is a small number
/// in [-0.02, 0.02]; each channel scales it into its own unit range.
const SLOPE_TREND_SCALE: f64 = 100.0;
const JOINT_TREND_SCALE: f64 = 5.0;
const ROCK_TREND_SCALE: f64 = 50.0;
const WEATHERING_TREND_SCALE: f64 = 10.0;
const RAINFALL_TREND_SCALE: f64 = 20.0;
const VIBRATION_TREND_SCALE: f64 = 5.0;

/// Daily temperature swing amplitude in degrees C
const DAILY_TEMP_AMPLITUDE: f64 = 3.0;

/// Sensor id pool rotated by wall-clock second
const SENSOR_POOL_BASE: i64 = 1001;
const SENSOR_POOL_SIZE: i64 = 5;

/// Mine sectors, weighted toward the north wall
const SECTOR_POOL: &[&str] = &["Sector-North", "Sector-North", "Sector-East", "Sector-South"];

/// Sparse event counters draw from this pool (mostly zero, sometimes one)
const RARE_EVENT_POOL: &[u32] = &[0, 0, 0, 1];

// ============================================================================
// BASE VALUES
// ============================================================================

/// Resting channel values the trend bias and jitter move around.
#[derive(Debug, Clone, Copy)]
pub struct BaseValues {
    pub slope_angle: f64,
    pub joint_spacing: f64,
    pub rock_strength: f64,
    pub weathering_index: f64,
    pub rainfall_24h: f64,
    pub temperature_variation: f64,
    pub vibration_intensity: f64,
    pub blast_distance: f64,
    pub excavation_height: f64,
}

impl Default for BaseValues {
    fn default() -> Self {
        Self {
            slope_angle: 45.0,
            joint_spacing: 1.2,
            rock_strength: 55.0,
            weathering_index: 5.5,
            rainfall_24h: 2.0,
            temperature_variation: 15.0,
            vibration_intensity: 2.0,
            blast_distance: 200.0,
            excavation_height: 25.0,
        }
    }
}

// ============================================================================
// SENSOR READING
// ============================================================================

/// One synthetic telemetry snapshot, flat on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub slope_angle: f64,
    pub joint_spacing: f64,
    pub rock_strength: f64,
    pub weathering_index: f64,
    pub rainfall_24h: f64,
    pub rainfall_7d: f64,
    pub temperature_variation: f64,
    pub vibration_intensity: f64,
    pub joint_orientation: f64,
    pub freeze_thaw_cycles: u32,
    pub wind_speed: f64,
    pub blast_distance: f64,
    pub excavation_height: f64,
    pub support_density: f64,
    pub previous_rockfall_30d: u32,
    pub maintenance_days_since: u32,
    pub timestamp: DateTime<Utc>,
    pub sensor_id: String,
    pub location: String,
}

impl SensorReading {
    /// Model input channels of this reading. Carries every column, so the
    /// strict trained-model path accepts it as-is.
    pub fn to_features(&self) -> FeatureMap {
        let mut features = FeatureMap::new();
        features.insert("slope_angle", self.slope_angle);
        features.insert("joint_spacing", self.joint_spacing);
        features.insert("joint_orientation", self.joint_orientation);
        features.insert("rock_strength", self.rock_strength);
        features.insert("weathering_index", self.weathering_index);
        features.insert("rainfall_24h", self.rainfall_24h);
        features.insert("rainfall_7d", self.rainfall_7d);
        features.insert("temperature_variation", self.temperature_variation);
        features.insert("freeze_thaw_cycles", f64::from(self.freeze_thaw_cycles));
        features.insert("wind_speed", self.wind_speed);
        features.insert("vibration_intensity", self.vibration_intensity);
        features.insert("blast_distance", self.blast_distance);
        features.insert("excavation_height", self.excavation_height);
        features.insert("support_density", self.support_density);
        features.insert("previous_rockfall_30d", f64::from(self.previous_rockfall_30d));
        features.insert(
            "maintenance_days_since",
            f64::from(self.maintenance_days_since),
        );
        features
    }
}

// ============================================================================
// SIMULATOR
// ============================================================================

/// Stateful telemetry generator owning base values, trend state, and its RNG.
pub struct TelemetrySimulator {
    bases: BaseValues,
    trend: TrendState,
    rng: StdRng,
}

impl TelemetrySimulator {
    /// Simulator over the default resting values. `seed` pins the stream for
    /// reproducible demos; `None` draws from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_bases(BaseValues::default(), seed)
    }

    pub fn with_bases(bases: BaseValues, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            bases,
            trend: TrendState::new(Utc::now()),
            rng,
        }
    }

    pub fn trend(&self) -> &TrendState {
        &self.trend
    }

    /// Next reading at the current wall-clock instant.
    pub fn generate(&mut self) -> SensorReading {
        self.generate_at(Utc::now())
    }

    /// Next reading at an explicit instant. The instant drives the trend
    /// clock, the daily temperature cycle, and the sensor-id rotation.
    pub fn generate_at(&mut self, now: DateTime<Utc>) -> SensorReading {
        self.trend.advance_at(now, &mut self.rng);

        let bases = self.bases;

        let slope_angle = round1(
            bases.slope_angle
                + self.trend.offset(TrackedChannel::SlopeAngle) * SLOPE_TREND_SCALE
                + self.rng.gen_range(-0.3..=0.3),
        )
        .clamp(25.0, 75.0);

        let joint_spacing = round2(
            bases.joint_spacing
                + self.trend.offset(TrackedChannel::JointSpacing) * JOINT_TREND_SCALE
                + self.rng.gen_range(-0.02..=0.02),
        )
        .clamp(0.1, 3.0);

        let rock_strength = round1(
            bases.rock_strength
                + self.trend.offset(TrackedChannel::RockStrength) * ROCK_TREND_SCALE
                + self.rng.gen_range(-0.8..=0.8),
        )
        .clamp(20.0, 90.0);

        let weathering_index = round1(
            bases.weathering_index
                + self.trend.offset(TrackedChannel::WeatheringIndex) * WEATHERING_TREND_SCALE
                + self.rng.gen_range(-0.05..=0.05),
        )
        .clamp(1.0, 10.0);

        let rainfall_24h = round1(
            (bases.rainfall_24h
                + self.trend.offset(TrackedChannel::Rainfall24h) * RAINFALL_TREND_SCALE
                + self.rng.gen_range(-0.1..=0.1))
            .max(0.0),
        );

        // Weekly accumulation follows the daily value instead of drifting on
        // its own.
        let rainfall_7d = round1(rainfall_24h * 7.0 + self.rng.gen_range(-1.0..=1.0)).max(0.0);

        let temperature_variation = round1(
            bases.temperature_variation
                + daily_temperature_cycle(now)
                + self.rng.gen_range(-0.2..=0.2),
        )
        .clamp(5.0, 35.0);

        let vibration_intensity = round2(
            (bases.vibration_intensity
                + self.trend.offset(TrackedChannel::VibrationIntensity) * VIBRATION_TREND_SCALE
                + self.rng.gen_range(-0.05..=0.05))
            .max(0.1),
        )
        .clamp(0.1, 8.0);

        // Untracked channels: independent bounded draws with no trend memory
        let joint_orientation = round1(180.0 + self.rng.gen_range(-15.0..=15.0));
        let freeze_thaw_cycles = rare_event(&mut self.rng);
        let wind_speed = round1((8.0_f64 + self.rng.gen_range(-1.5..=1.5)).max(0.0));
        let blast_distance = round1(bases.blast_distance + self.rng.gen_range(-5.0..=5.0));
        let excavation_height = round1(bases.excavation_height + self.rng.gen_range(-0.5..=0.5));
        let support_density = round2(0.6 + self.rng.gen_range(-0.05..=0.05));
        let previous_rockfall_30d = rare_event(&mut self.rng);
        let maintenance_days_since: u32 = self.rng.gen_range(5..=10);

        SensorReading {
            slope_angle,
            joint_spacing,
            rock_strength,
            weathering_index,
            rainfall_24h,
            rainfall_7d,
            temperature_variation,
            vibration_intensity,
            joint_orientation,
            freeze_thaw_cycles,
            wind_speed,
            blast_distance,
            excavation_height,
            support_density,
            previous_rockfall_30d,
            maintenance_days_since,
            timestamp: now,
            sensor_id: sensor_id_at(now),
            location: pick_sector(&mut self.rng),
        }
    }
}

/// Sinusoidal temperature adjustment keyed to the hour of day, coldest
/// before dawn and warmest in the afternoon.
fn daily_temperature_cycle(now: DateTime<Utc>) -> f64 {
    let hour = f64::from(now.hour()) + f64::from(now.minute()) / 60.0;
    DAILY_TEMP_AMPLITUDE * ((hour - 6.0) * std::f64::consts::PI / 12.0).sin()
}

/// Sensor id rotated through the fixed pool by epoch second.
fn sensor_id_at(now: DateTime<Utc>) -> String {
    let slot = now.timestamp().rem_euclid(SENSOR_POOL_SIZE);
    format!("RS_{}", SENSOR_POOL_BASE + slot)
}

fn pick_sector<R: Rng + ?Sized>(rng: &mut R) -> String {
    SECTOR_POOL
        .choose(rng)
        .copied()
        .unwrap_or("Sector-North")
        .to_string()
}

fn rare_event<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    RARE_EVENT_POOL.choose(rng).copied().unwrap_or(0)
}

// ============================================================================
// TESTS
// ============================================================================
