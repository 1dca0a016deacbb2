//! Synthetic telemetry
//!
//! Everything the API fabricates instead of measuring: the live sensor
//! stream (`generator`), its slow-drift state (`trend`), and the hourly
//! history window (`historical`).

mod generator;
mod historical;
mod trend;

pub use generator::{BaseValues, SensorReading, TelemetrySimulator};
pub use historical::{
    generate_series_at, HistoricalPoint, HistoricalSeries, HistoricalSummary, SERIES_HOURS,
    WINDOW_HOURS,
};
pub use trend::{
    TrackedChannel, TrendState, TRACKED_COUNT, TREND_DRIFT_STEP, TREND_OFFSET_BOUND,
    TREND_UPDATE_INTERVAL_SECS,
};
