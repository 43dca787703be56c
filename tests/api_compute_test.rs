//! Integration tests for the /api/compute endpoint.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use common::app::TestApp;
use filigree::models::AppConfig;
use qim_mark::{Band, WatermarkConfig};

/// Small canvas keeps request bodies readable in failures.
fn small_app() -> TestApp {
    let config = AppConfig {
        watermark: WatermarkConfig {
            canvas: 4,
            bands: vec![Band::new(0, 2, 0, 2)],
            ..Default::default()
        },
        ..Default::default()
    };
    TestApp::with_config(config)
}

#[tokio::test]
async fn health_check_responds_ok() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn compute_round_trips_identity_vector() {
    let app = small_app();
    let input: Vec<f64> = (0..16).map(|i| i as f64 * 0.25 - 2.0).collect();
    let body = serde_json::json!({ "input": input }).to_string();

    let response = app.post_json("/api/compute", &body).await;
    assert_eq!(response.status, StatusCode::OK);

    let json: serde_json::Value = response.json();
    let output: Vec<f64> = json["output"]
        .as_array()
        .expect("output array")
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(output, input);
}

#[tokio::test]
async fn compute_rejects_wrong_vector_length() {
    let app = small_app();
    let body = serde_json::json!({ "input": [1.0, 2.0, 3.0] }).to_string();

    let response = app.post_json("/api/compute", &body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], 400);
    let message = json["error"].as_str().expect("error message");
    assert!(message.contains("16"), "message should name the expected length: {message}");
}

#[tokio::test]
async fn compute_rejects_empty_vector() {
    let app = small_app();
    let response = app
        .post_json("/api/compute", r#"{"input": []}"#)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn compute_rejects_malformed_json() {
    let app = small_app();
    let response = app.post_json("/api/compute", "{not json").await;
    // axum's Json extractor rejects before the handler runs
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn compute_handles_default_canvas_vectors() {
    let app = TestApp::new();
    let input = vec![0.125f64; 64 * 64];
    let body = serde_json::json!({ "input": input }).to_string();

    let response = app.post_json("/api/compute", &body).await;
    assert_eq!(response.status, StatusCode::OK);

    let json: serde_json::Value = response.json();
    assert_eq!(json["output"].as_array().unwrap().len(), 64 * 64);
}
