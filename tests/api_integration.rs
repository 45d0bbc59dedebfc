//! HTTP round trips against artifacts trained from CSV

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{hardness_label, train_both, EXAMPLE_PAYLOAD};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use weldpredict::server::{PredictServer, ServerConfig};
use weldpredict::ModelRegistry;

fn trained_server() -> (tempfile::TempDir, PredictServer) {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models");
    train_both(dir.path(), &model_dir, 1.0);

    let registry = Arc::new(ModelRegistry::from_dir(&model_dir));
    (dir, PredictServer::new(ServerConfig::default(), registry))
}

fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/predict")
        .header("Content-Type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_example_payload_predicts_both() {
    let (_dir, server) = trained_server();

    let response = server
        .router()
        .oneshot(post_predict(EXAMPLE_PAYLOAD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["hardness_error"].is_null());
    assert!(json["oxidation_error"].is_null());

    let expected = hardness_label("EN-8", 140.0, 0.864, 0.37, 0.8, 1.0);
    let hardness = json["hardness"].as_f64().unwrap();
    assert!((hardness - expected).abs() < 0.05, "{hardness} vs {expected}");

    let oxidation = json["oxidation"].as_f64().unwrap();
    assert!(oxidation.is_finite() && oxidation > 0.0);
}

#[tokio::test]
async fn test_string_numbers_are_accepted() {
    let (_dir, server) = trained_server();
    let body = r#"{"Material":"Mild Steel","Current":"120","Heat_Input":"0.7","Soaking_Time":"15","Carbon":"0.2","Manganese":"0.9"}"#;

    let json = body_json(server.router().oneshot(post_predict(body)).await.unwrap()).await;
    assert!(json["hardness"].is_number());
    assert!(json["oxidation"].is_number());
}

#[tokio::test]
async fn test_unknown_material_fails_both() {
    let (_dir, server) = trained_server();
    let body = EXAMPLE_PAYLOAD.replace("EN-8", "Titanium");

    let response = server.router().oneshot(post_predict(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let expected = "Invalid material 'Titanium'. Must be one of: ['EN-8', 'Mild Steel']";
    assert_eq!(
        body_json(response).await,
        json!({
            "hardness": null,
            "oxidation": null,
            "hardness_error": expected,
            "oxidation_error": expected
        })
    );
}

#[tokio::test]
async fn test_missing_soaking_time_only_fails_oxidation() {
    let (_dir, server) = trained_server();
    let body = r#"{"Material":"EN-8","Current":140,"Heat_Input":0.864,"Carbon":0.37,"Manganese":0.8}"#;

    let json = body_json(server.router().oneshot(post_predict(body)).await.unwrap()).await;
    assert!(json["hardness"].is_number());
    assert!(json["hardness_error"].is_null());
    assert!(json["oxidation"].is_null());
    assert_eq!(
        json["oxidation_error"],
        "Missing required value for 'Soaking_Time'"
    );
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let (_dir, server) = trained_server();

    for body in ["{not json", "", "{\"Material\": }"] {
        let response = server.router().oneshot(post_predict(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(body_json(response).await, json!({"error": "Invalid JSON"}));
    }
}

#[tokio::test]
async fn test_non_object_body_reports_per_target_errors() {
    let (_dir, server) = trained_server();

    for body in ["[1, 2, 3]", "null", "\"EN-8\""] {
        let response = server.router().oneshot(post_predict(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "body {body}");

        let json = body_json(response).await;
        assert!(json["hardness"].is_null());
        assert!(json["oxidation"].is_null());
        assert!(json["hardness_error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid material 'null'"));
        assert_eq!(json["hardness_error"], json["oxidation_error"]);
    }
}

#[tokio::test]
async fn test_missing_artifacts_report_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ModelRegistry::from_dir(dir.path()));
    let server = PredictServer::new(ServerConfig::default(), registry);

    let response = server
        .router()
        .oneshot(post_predict(EXAMPLE_PAYLOAD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["hardness"].is_null());
    let error = json["hardness_error"].as_str().unwrap();
    assert!(error.starts_with("Hardness model unavailable"), "{error}");
    assert!(json["oxidation_error"]
        .as_str()
        .unwrap()
        .starts_with("Oxidation model unavailable"));
}

#[tokio::test]
async fn test_models_endpoint_after_predict() {
    let (_dir, server) = trained_server();
    let app = server.router();

    app.clone().oneshot(post_predict(EXAMPLE_PAYLOAD)).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/models")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let models = json["models"].as_array().unwrap();
    assert_eq!(models.len(), 2);
    assert!(models.iter().all(|m| m["state"] == "loaded"));
}
