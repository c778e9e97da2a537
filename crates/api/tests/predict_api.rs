//! End-to-end tests against a bound listener

use api::settings::{ModelConfig, ScalingMode};
use api::{create_router, AppState};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

const MODEL: &str = r#"{
    "coefficients": [-1.0, 0.5, 2.0, 0.5, 0.0, 0.0],
    "intercept": -0.5,
    "classes": ["denied", "approved"],
    "scaler": {
        "Num_Children": {"mean": 1.0, "scale": 1.0},
        "Income": {"mean": 1500.0, "scale": 500.0}
    }
}"#;

fn write_model(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
    std::fs::write(&path, MODEL).unwrap();
    path
}

async fn spawn_server(scaling: ScalingMode, name: &str) -> SocketAddr {
    let model_path = write_model(name);
    let config = ModelConfig {
        path: model_path.to_string_lossy().into_owned(),
        scaling,
        scaler_path: None,
    };
    let state = Arc::new(AppState::load(&config).unwrap());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    addr
}

async fn post(addr: SocketAddr, body: &Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/predict"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

fn applicants() -> Value {
    json!({
        "Num_Children": [0, 3, 1],
        "Gender": ["Female", "Male", "Male"],
        "Income": [2500, 900, 1500],
        "Own_Car": ["Yes", "No", "Yes"],
        "Own_Housing": ["Yes", "No", "No"]
    })
}

#[tokio::test]
async fn test_labels_match_batch_size() {
    let addr = spawn_server(ScalingMode::PerBatch, "approval-per-batch").await;

    let (status, body) = post(addr, &applicants()).await;
    assert_eq!(status, 200);
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 3);
    assert!(predictions
        .iter()
        .all(|p| p == "approved" || p == "denied"));
}

#[tokio::test]
async fn test_fitted_scaling_is_stable_across_batches() {
    let addr = spawn_server(ScalingMode::Fitted, "approval-fitted").await;

    let single = json!({
        "Num_Children": [3],
        "Gender": ["Male"],
        "Income": [900],
        "Own_Car": ["No"],
        "Own_Housing": ["No"]
    });

    let (_, alone) = post(addr, &single).await;
    let (_, batched) = post(addr, &applicants()).await;
    assert_eq!(alone["predictions"][0], batched["predictions"][1]);
    assert_eq!(alone, json!({"predictions": ["denied"]}));
}

#[tokio::test]
async fn test_validation_errors_over_http() {
    let addr = spawn_server(ScalingMode::PerBatch, "approval-errors").await;

    let mut missing = applicants();
    missing.as_object_mut().unwrap().remove("Num_Children");
    let (status, body) = post(addr, &missing).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing required field: Num_Children");

    let mut unknown = applicants();
    unknown["Gender"] = json!(["Female", "Unknown", "Male"]);
    let (status, body) = post(addr, &unknown).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing field: Unknown");
}

#[test]
fn test_missing_artifact_is_fatal() {
    let config = ModelConfig {
        path: "/nonexistent/model.json".to_string(),
        ..Default::default()
    };
    assert!(AppState::load(&config).is_err());
}
