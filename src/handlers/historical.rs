//! Historical trend handler

use axum::Json;
use chrono::Utc;

use crate::simulation::{generate_series_at, HistoricalSeries};

/// Recent fabricated risk history for the dashboard charts
pub async fn historical_data() -> Json<HistoricalSeries> {
    let series = generate_series_at(Utc::now(), &mut rand::thread_rng());
    Json(series)
}
