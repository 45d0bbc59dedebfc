//! Evaluation of a saved artifact against a dataset

use super::dataset::Dataset;
use super::metrics::EvalMetrics;
use super::trainer::score;
use crate::io::load_artifact;
use crate::schema::Target;
use crate::Result;
use std::path::{Path, PathBuf};

/// Metrics for a saved artifact over a full dataset
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub target: Target,
    pub artifact_path: PathBuf,
    pub rows: usize,
    pub metrics: EvalMetrics,
}

/// Load the artifact at `artifact_path` and score it on every row of `data`
pub fn evaluate_artifact(
    target: Target,
    artifact_path: impl AsRef<Path>,
    data: impl AsRef<Path>,
) -> Result<EvaluationReport> {
    let artifact_path = artifact_path.as_ref();

    let artifact = load_artifact(artifact_path)?;
    artifact.check_target(target)?;
    let dataset = Dataset::from_csv_path(target, data)?;
    let metrics = score(&artifact, &dataset)?;

    tracing::info!(
        target_model = %target,
        rows = dataset.len(),
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "evaluation complete"
    );

    Ok(EvaluationReport {
        target,
        artifact_path: artifact_path.to_path_buf(),
        rows: dataset.len(),
        metrics,
    })
}
