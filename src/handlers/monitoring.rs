//! Live monitoring handler

use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;

use crate::risk::RiskAssessment;
use crate::simulation::SensorReading;
use crate::{AppResult, AppState};

/// Chance the simulated sensor network reports as online
const SENSORS_ONLINE_RATE: f64 = 0.9;

#[derive(Debug, Serialize)]
pub struct MockDataResponse {
    pub sensor_data: SensorReading,
    pub prediction: RiskAssessment,
    pub system_status: SystemStatus,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub sensors_online: bool,
    pub last_maintenance: DateTime<Utc>,
    pub alert_level: &'static str,
    pub data_quality: &'static str,
    pub network_status: &'static str,
}

/// One simulated sensor snapshot with its risk assessment
pub async fn mock_data(State(state): State<AppState>) -> AppResult<Json<MockDataResponse>> {
    let reading = state.simulator.lock().generate();
    let prediction = state.assess(&reading.to_features())?;

    let mut rng = rand::thread_rng();
    let sensors_online = rng.gen_bool(SENSORS_ONLINE_RATE);

    let system_status = SystemStatus {
        sensors_online,
        last_maintenance: Utc::now() - Duration::days(rng.gen_range(7..=10)),
        alert_level: prediction.risk_category.alert_level(),
        data_quality: if sensors_online { "excellent" } else { "good" },
        network_status: "stable",
    };

    Ok(Json(MockDataResponse {
        sensor_data: reading,
        prediction,
        system_status,
    }))
}
