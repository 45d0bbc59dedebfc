//! # weldpredict: weld hardness and oxidation-rate regression
//!
//! Two pre-fit regression pipelines served behind an HTTP endpoint. A request
//! is validated per target, dispatched to the target's artifact, and answered
//! with one value or one error message per target.
//!
//! ## Architecture
//!
//! - **schema**: Required fields and their order for each target
//! - **validate**: Payload validation and coercion into feature records
//! - **pipeline**: One-hot encoder, standard scaler, linear and forest estimators
//! - **io**: Artifact save/load (JSON, YAML) and metadata sidecars
//! - **registry**: Lazy, reloadable artifact cache
//! - **predict**: Validate → predict → respond, per target
//! - **server**: axum HTTP API
//! - **train**: CSV datasets, train/test split, fitting, metrics
//! - **config**: YAML configuration and CLI

pub mod config;
pub mod io;
pub mod pipeline;
pub mod predict;
pub mod registry;
pub mod schema;
pub mod server;
pub mod train;
pub mod validate;

pub mod error;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{Error, Result};
pub use predict::{PredictError, PredictResponse, Predictor};
pub use registry::ModelRegistry;
pub use schema::{FeatureRecord, FeatureValue, Target};
pub use validate::ValidationError;
