//! Regression metrics for evaluation
//!
//! MAE, RMSE and R² over paired prediction/label slices, plus
//! [`EvalMetrics`], the bundle written to the metadata sidecar.

use serde::{Deserialize, Serialize};

/// Trait for evaluation metrics
pub trait Metric {
    /// Compute the metric given predictions and targets
    ///
    /// # Panics
    ///
    /// If the slices differ in length.
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64;

    /// Name of the metric
    fn name(&self) -> &str;

    /// Whether higher values are better (true) or lower (false)
    fn higher_is_better(&self) -> bool {
        true
    }
}

/// R² (coefficient of determination)
///
/// R² = 1 - SS_res / SS_tot
///
/// R² = 1.0 is perfect prediction, 0.0 means predicting the mean. Constant
/// targets give 1.0 for an exact fit and 0.0 otherwise.
///
/// # Example
///
/// ```
/// use weldpredict::train::{Metric, R2Score};
///
/// let r2 = R2Score.compute(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
/// assert!((r2 - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct R2Score;

impl Metric for R2Score {
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        assert_eq!(predictions.len(), targets.len());

        if predictions.is_empty() {
            return 0.0;
        }

        let y_mean = targets.iter().sum::<f64>() / targets.len() as f64;

        let ss_res: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(&p, &t)| (t - p).powi(2))
            .sum();

        let ss_tot: f64 = targets.iter().map(|&t| (t - y_mean).powi(2)).sum();

        if ss_tot == 0.0 {
            return if ss_res == 0.0 { 1.0 } else { 0.0 };
        }

        1.0 - (ss_res / ss_tot)
    }

    fn name(&self) -> &str {
        "R2"
    }
}

/// Mean Absolute Error
///
/// ```
/// use weldpredict::train::{Metric, MAE};
///
/// let mae = MAE.compute(&[1.0, 2.0, 3.0], &[1.5, 2.5, 3.5]);
/// assert!((mae - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MAE;

impl Metric for MAE {
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        assert_eq!(predictions.len(), targets.len());

        if predictions.is_empty() {
            return 0.0;
        }

        predictions
            .iter()
            .zip(targets)
            .map(|(&p, &t)| (p - t).abs())
            .sum::<f64>()
            / predictions.len() as f64
    }

    fn name(&self) -> &str {
        "MAE"
    }

    fn higher_is_better(&self) -> bool {
        false
    }
}

/// Root Mean Squared Error
#[derive(Debug, Clone, Copy, Default)]
pub struct RMSE;

impl Metric for RMSE {
    fn compute(&self, predictions: &[f64], targets: &[f64]) -> f64 {
        assert_eq!(predictions.len(), targets.len());

        if predictions.is_empty() {
            return 0.0;
        }

        let mse = predictions
            .iter()
            .zip(targets)
            .map(|(&p, &t)| (p - t).powi(2))
            .sum::<f64>()
            / predictions.len() as f64;

        mse.sqrt()
    }

    fn name(&self) -> &str {
        "RMSE"
    }

    fn higher_is_better(&self) -> bool {
        false
    }
}

/// Held-out metrics for one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "R2")]
    pub r2: f64,
}

impl EvalMetrics {
    pub fn compute(predictions: &[f64], targets: &[f64]) -> Self {
        Self {
            mae: MAE.compute(predictions, targets),
            rmse: RMSE.compute(predictions, targets),
            r2: R2Score.compute(predictions, targets),
        }
    }
}
