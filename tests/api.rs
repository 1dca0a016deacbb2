//! Integration tests driving the full router in-process.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use rockfall_api::config::Config;
use rockfall_api::model::{train, TrainingOptions};
use rockfall_api::{create_router, AppState};

fn test_app() -> axum::Router {
    let config = Config {
        telemetry_seed: Some(42),
        ..Config::default()
    };
    create_router(AppState::new(config))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Full sixteen-channel payload a live dashboard would send.
fn full_channel_payload() -> Value {
    json!({
        "slope_angle": 45.5,
        "joint_spacing": 0.8,
        "joint_orientation": 120.0,
        "rock_strength": 55.2,
        "weathering_index": 4.5,
        "rainfall_24h": 5.2,
        "rainfall_7d": 22.8,
        "temperature_variation": 18.5,
        "freeze_thaw_cycles": 2,
        "wind_speed": 7.3,
        "vibration_intensity": 2.1,
        "blast_distance": 200.0,
        "excavation_height": 28.5,
        "support_density": 0.65,
        "previous_rockfall_30d": 1,
        "maintenance_days_since": 12
    })
}

const CATEGORIES: [&str; 4] = ["Low", "Medium", "High", "Critical"];

#[tokio::test]
async fn index_reports_service_directory() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "online");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["model_loaded"], false);
    assert!(body["endpoints"]["/predict"].as_str().unwrap().starts_with("POST"));
    assert!(body["endpoints"]["/health"].as_str().unwrap().starts_with("GET"));
}

#[tokio::test]
async fn health_reports_model_status() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_status"], "not_loaded");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn predict_returns_assessment() {
    let response = test_app()
        .oneshot(post_json("/predict", &full_channel_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let category = body["risk_category"].as_str().unwrap();
    assert!(CATEGORIES.contains(&category), "unknown category {category}");

    let probability = body["risk_probability"].as_f64().unwrap();
    assert!((5.0..=95.0).contains(&probability));

    let confidence = body["confidence"].as_f64().unwrap();
    assert!((75.0..=95.0).contains(&confidence));

    for key in CATEGORIES {
        assert!(body["category_probabilities"][key].as_f64().unwrap() >= 0.0);
    }

    assert_eq!(body["input_summary"]["slope_angle"], 45.5);
    assert_eq!(body["input_summary"]["rock_strength"], 55.2);
    assert_eq!(body["api_version"], "1.0.0");
    assert!(body["prediction_time"].is_string());
}

#[tokio::test]
async fn predict_accepts_minimal_required_channels() {
    let payload = json!({
        "slope_angle": 60.0,
        "joint_spacing": 0.5,
        "rock_strength": 40.0
    });

    let response = test_app().oneshot(post_json("/predict", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // Absent optional channels echo as zero in the summary.
    assert_eq!(body["input_summary"]["rainfall_24h"], 0.0);
    assert_eq!(body["input_summary"]["vibration_intensity"], 0.0);
}

#[tokio::test]
async fn predict_rejects_missing_fields() {
    let payload = json!({ "slope_angle": 45.0 });

    let response = test_app().oneshot(post_json("/predict", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Missing required fields:"));
    assert!(message.contains("joint_spacing"));
    assert!(message.contains("rock_strength"));

    // The contract echoes the full required list, not just what was missing.
    assert_eq!(
        body["required_fields"],
        json!(["slope_angle", "joint_spacing", "rock_strength"])
    );
}

#[tokio::test]
async fn predict_rejects_empty_object() {
    let response = test_app().oneshot(post_json("/predict", &json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No input data provided");
}

#[tokio::test]
async fn predict_rejects_non_json_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("not json"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Request must contain JSON data");
}

#[tokio::test]
async fn mock_data_returns_reading_with_assessment() {
    let response = test_app().oneshot(get("/mock-data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;

    let sensor = &body["sensor_data"];
    let slope = sensor["slope_angle"].as_f64().unwrap();
    assert!((25.0..=75.0).contains(&slope));
    let joint = sensor["joint_spacing"].as_f64().unwrap();
    assert!((0.1..=3.0).contains(&joint));
    assert!(sensor["sensor_id"].as_str().unwrap().starts_with("RS_10"));
    assert!(sensor["location"].as_str().unwrap().starts_with("Sector-"));

    let category = body["prediction"]["risk_category"].as_str().unwrap();
    assert!(CATEGORIES.contains(&category));

    let status = &body["system_status"];
    assert!(status["sensors_online"].is_boolean());
    assert!(["low", "medium", "high", "critical"]
        .contains(&status["alert_level"].as_str().unwrap()));
    assert!(["excellent", "good"].contains(&status["data_quality"].as_str().unwrap()));
    assert_eq!(status["network_status"], "stable");
    assert!(status["last_maintenance"].is_string());
}

#[tokio::test]
async fn historical_data_returns_recent_window() {
    let response = test_app().oneshot(get("/historical-data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 48);

    for point in data {
        let risk = point["risk_probability"].as_f64().unwrap();
        assert!((10.0..=85.0).contains(&risk));
        assert!(CATEGORIES.contains(&point["risk_category"].as_str().unwrap()));
    }

    let summary = &body["summary"];
    assert_eq!(summary["total_points"], 48);
    assert!(summary["avg_risk"].as_f64().unwrap() >= 10.0);
    assert!(["stable", "increasing"].contains(&summary["trend"].as_str().unwrap()));
}

#[tokio::test]
async fn unknown_route_returns_not_found() {
    let response = test_app().oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn development_cors_is_wide_open() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn trained_model_serves_predictions() {
    let options = TrainingOptions {
        n_samples: 600,
        epochs: 300,
        ..TrainingOptions::default()
    };
    let outcome = train(&options).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("rockfall_model.json");
    outcome.artifact.save(&model_path).unwrap();

    let state = AppState::new(Config {
        model_path: Some(model_path),
        ..Config::default()
    });
    assert!(state.model_loaded());
    let app = create_router(state);

    // Health flips to loaded.
    let response = app.clone().oneshot(get("/health")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["model_status"], "loaded");

    // A full payload goes through the trained path.
    let response = app
        .clone()
        .oneshot(post_json("/predict", &full_channel_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(CATEGORIES.contains(&body["risk_category"].as_str().unwrap()));
    let probability = body["risk_probability"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&probability));

    // The model path is strict: dropping any column fails the request.
    let mut partial = full_channel_payload();
    partial.as_object_mut().unwrap().remove("wind_speed");

    let response = app.oneshot(post_json("/predict", &partial)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required feature: wind_speed");
}
