//! Prediction dispatch
//!
//! For each target: ensure the artifact is available, validate the payload
//! against the target's schema, then invoke the artifact. The two targets
//! never affect each other; [`Predictor::predict_both`] runs them side by side
//! and reports each outcome separately.


use crate::registry::ModelRegistry;
use crate::schema::Target;
use crate::validate::{validate, Payload, ValidationError};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Text shown for any failure inside the artifact itself
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error during prediction. Check logs.";

/// Why a single-target prediction produced no value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    /// Payload failed validation; the message is shown verbatim
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The target's artifact is missing or failed to load
    #[error("{} model unavailable: {reason}", .target.display_name())]
    ModelUnavailable { target: Target, reason: String },

    /// The artifact failed or panicked; details are only in the logs
    #[error("{}", INTERNAL_ERROR_MESSAGE)]
    Internal,
}

/// Combined response for both targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub hardness: Option<f64>,
    pub oxidation: Option<f64>,
    pub hardness_error: Option<String>,
    pub oxidation_error: Option<String>,
}

impl PredictResponse {
    fn from_results(
        hardness: Result<f64, PredictError>,
        oxidation: Result<f64, PredictError>,
    ) -> Self {
        let (hardness, hardness_error) = split(hardness);
        let (oxidation, oxidation_error) = split(oxidation);
        Self {
            hardness,
            oxidation,
            hardness_error,
            oxidation_error,
        }
    }
}

fn split(result: Result<f64, PredictError>) -> (Option<f64>, Option<String>) {
    match result {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some(e.to_string())),
    }
}

/// Runs predictions against a shared registry
#[derive(Debug, Clone)]
pub struct Predictor {
    registry: Arc<ModelRegistry>,
}

impl Predictor {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Predict one target from a raw payload
    pub fn predict(&self, target: Target, payload: &Payload) -> Result<f64, PredictError> {
        let model = self
            .registry
            .ensure_loaded(target)
            .map_err(|reason| PredictError::ModelUnavailable { target, reason })?;

        let record = validate(target.schema(), payload).inspect_err(|e| {
            tracing::debug!(target_model = %target, field = e.field(), error = %e, "validation failed");
        })?;

        match panic::catch_unwind(AssertUnwindSafe(|| model.predict(&record))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!(target_model = %target, error = %e, "prediction failed");
                Err(PredictError::Internal)
            }
            Err(cause) => {
                let detail = cause
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| cause.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(target_model = %target, panic = %detail, "prediction panicked");
                Err(PredictError::Internal)
            }
        }
    }

    pub fn predict_hardness(&self, payload: &Payload) -> Result<f64, PredictError> {
        self.predict(Target::Hardness, payload)
    }

    pub fn predict_oxidation(&self, payload: &Payload) -> Result<f64, PredictError> {
        self.predict(Target::Oxidation, payload)
    }

    /// Both targets from the same payload
    pub fn predict_both(&self, payload: &Payload) -> PredictResponse {
        PredictResponse::from_results(
            self.predict_hardness(payload),
            self.predict_oxidation(payload),
        )
    }
}
