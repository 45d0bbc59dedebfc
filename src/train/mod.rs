//! Offline training and evaluation
//!
//! This module provides the batch side of the system:
//! - CSV dataset loading with payload-equivalent validation
//! - Seeded train/test split
//! - Pipeline fitting, artifact and metadata output
//! - Regression metrics (MAE, RMSE, R²)
//!
//! # Example
//!
//! ```no_run
//! use weldpredict::schema::Target;
//! use weldpredict::train::{train_target, TrainOptions};
//!
//! let options = TrainOptions::new(Target::Hardness, "data/hardness.csv", "models");
//! let report = train_target(&options).unwrap();
//! println!("R2 = {:.4}", report.metrics.r2);
//! ```

mod dataset;
mod evaluate;
mod metrics;
mod split;
mod trainer;

#[cfg(test)]
mod tests;

pub use dataset::Dataset;
pub use evaluate::{evaluate_artifact, EvaluationReport};
pub use metrics::{EvalMetrics, Metric, R2Score, MAE, RMSE};
pub use split::train_test_split;
pub use trainer::{fit_and_evaluate, score, train_target, FitOutcome, TrainOptions, TrainReport};
