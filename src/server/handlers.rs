//! Request handlers

use crate::predict::{PredictResponse, INTERNAL_ERROR_MESSAGE};
use crate::server::{AppState, ErrorResponse, HealthResponse, ModelsResponse};
use crate::validate::Payload;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// `POST /api/v1/predict`
///
/// The body is read raw so that unparseable JSON maps to a 400. Valid JSON
/// that is not an object is treated as an empty payload, so each target
/// reports its own validation error. Everything past parsing is a 200.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::debug!(
                kind = json_kind(&other),
                "non-object payload, predicting on no fields"
            );
            Payload::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "rejected malformed payload");
            return invalid_json();
        }
    };

    // Cold loads read and parse artifacts from disk
    let predictor = state.predictor.clone();
    let response = tokio::task::spawn_blocking(move || predictor.predict_both(&payload))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "prediction task failed");
            PredictResponse {
                hardness: None,
                oxidation: None,
                hardness_error: Some(INTERNAL_ERROR_MESSAGE.to_string()),
                oxidation_error: Some(INTERNAL_ERROR_MESSAGE.to_string()),
            }
        });

    Json(response).into_response()
}

pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.registry().status(),
    })
}

pub async fn reload_models(State(state): State<AppState>) -> Response {
    tracing::info!("reloading models");
    let registry = state.predictor.registry().clone();
    match tokio::task::spawn_blocking(move || registry.reload()).await {
        Ok(models) => Json(ModelsResponse { models }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "reload task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Reload failed. Check logs.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn invalid_json() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid JSON".to_string(),
        }),
    )
        .into_response()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
