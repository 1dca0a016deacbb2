//! Feature Channels - Centralized Channel Definition
//!
//! Single source of truth for the sensor channel schema: the model input
//! order, the channels the request layer requires, and the defaults the
//! formula scorer substitutes for absent channels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// MODEL INPUT LAYOUT
// ============================================================================

/// Channel names in the exact order the trained model consumes them.
pub const FEATURE_COLUMNS: &[&str] = &[
    // === Geological (0-4) ===
    "slope_angle",           // 0: Slope angle in degrees
    "joint_spacing",         // 1: Joint spacing in meters
    "joint_orientation",     // 2: Joint orientation in degrees
    "rock_strength",         // 3: Rock strength in MPa
    "weathering_index",      // 4: Weathering on a 0-10 scale

    // === Environmental (5-9) ===
    "rainfall_24h",          // 5: Rainfall last 24h in mm
    "rainfall_7d",           // 6: Rainfall last 7 days in mm
    "temperature_variation", // 7: Temperature variation in degrees C
    "freeze_thaw_cycles",    // 8: Freeze/thaw cycle count
    "wind_speed",            // 9: Wind speed in m/s

    // === Structural (10-13) ===
    "vibration_intensity",   // 10: Ground vibration in mm/s
    "blast_distance",        // 11: Distance to last blast in meters
    "excavation_height",     // 12: Bench excavation height in meters
    "support_density",       // 13: Installed support ratio 0-1

    // === Historical (14-15) ===
    "previous_rockfall_30d", // 14: Rockfall events in last 30 days
    "maintenance_days_since",// 15: Days since last maintenance
];

/// Total number of model input channels.
/// IMPORTANT: Must match FEATURE_COLUMNS.len()!
pub const FEATURE_COUNT: usize = 16;

/// Channels a prediction request must carry.
///
/// Note: `rock_strength` is required by the request contract even though the
/// formula scorer never reads it. The trained model does consume it.
pub const REQUIRED_CHANNELS: &[&str] = &["slope_angle", "joint_spacing", "rock_strength"];

// ============================================================================
// SCORER DEFAULTS
// ============================================================================

/// Default slope angle (degrees) when the channel is absent
pub const DEFAULT_SLOPE_ANGLE: f64 = 45.0;
/// Default joint spacing (meters) when the channel is absent
pub const DEFAULT_JOINT_SPACING: f64 = 1.0;
/// Default weathering index when the channel is absent
pub const DEFAULT_WEATHERING_INDEX: f64 = 5.0;
/// Default 24h rainfall (mm) when the channel is absent
pub const DEFAULT_RAINFALL_24H: f64 = 0.0;
/// Default vibration intensity (mm/s) when the channel is absent
pub const DEFAULT_VIBRATION_INTENSITY: f64 = 1.0;

// ============================================================================
// CHANNEL INDEX LOOKUP
// ============================================================================

/// Get channel index by name (O(n) but channels are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|&n| n == name)
}

/// Get channel name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_COLUMNS.get(index).copied()
}

// ============================================================================
// FEATURE MAP
// ============================================================================

/// Named channel -> value mapping, the wire format for prediction requests.
///
/// Serializes as a bare JSON object. No ordering; absent channels are the
/// caller's business and fall back per consumer (scorer defaults, or a hard
/// error in the trained-model path).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMap(pub HashMap<String, f64>);

impl FeatureMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Channel value, or the given default when absent.
    pub fn get_or(&self, channel: &str, default: f64) -> f64 {
        self.0.get(channel).copied().unwrap_or(default)
    }

    /// Channel value, if present.
    pub fn get(&self, channel: &str) -> Option<f64> {
        self.0.get(channel).copied()
    }

    pub fn insert(&mut self, channel: impl Into<String>, value: f64) {
        self.0.insert(channel.into(), value);
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.0.contains_key(channel)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Required channels absent from this map, in contract order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_CHANNELS
            .iter()
            .copied()
            .filter(|c| !self.contains(c))
            .collect()
    }

    /// Model input columns absent from this map, in layout order.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        FEATURE_COLUMNS
            .iter()
            .copied()
            .filter(|c| !self.contains(c))
            .collect()
    }
}

impl FromIterator<(String, f64)> for FeatureMap {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// WIRE ROUNDING
// ============================================================================

/// Round to one decimal, the reporting precision of most channels.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimals, used by the fine-grained channels
/// (joint spacing, vibration, support density).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// TESTS
// ============================================================================
