//! Offline training of one target

use super::dataset::Dataset;
use super::metrics::EvalMetrics;
use super::split::train_test_split;
use crate::io::{save_artifact, save_metadata, ModelArtifact, ModelFormat, ModelMetadata, SaveConfig};
use crate::pipeline::{EstimatorSpec, Pipeline, Regressor};
use crate::schema::Target;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything `train_target` needs
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub target: Target,
    /// CSV dataset
    pub data: PathBuf,
    /// Directory receiving the artifact and metadata sidecar
    pub model_dir: PathBuf,
    pub estimator: EstimatorSpec,
    pub format: ModelFormat,
    pub test_size: f64,
    pub seed: u64,
}

impl TrainOptions {
    /// Defaults: target's usual estimator, JSON, 20% held out, seed 42
    pub fn new(target: Target, data: impl Into<PathBuf>, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            target,
            data: data.into(),
            model_dir: model_dir.into(),
            estimator: EstimatorSpec::default_for(target),
            format: ModelFormat::Json,
            test_size: 0.2,
            seed: 42,
        }
    }

    pub fn with_estimator(mut self, estimator: EstimatorSpec) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// `<model_dir>/<target>_model.<ext>`
    pub fn artifact_path(&self) -> PathBuf {
        self.model_dir.join(format!(
            "{}_model.{}",
            self.target.as_str(),
            self.format.extension()
        ))
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.model_dir.join(self.target.metadata_file_name())
    }
}

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub target: Target,
    pub artifact_path: PathBuf,
    pub metadata_path: PathBuf,
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: EvalMetrics,
    pub elapsed_secs: f64,
}

/// A fitted artifact with its held-out metrics, before anything is written
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub artifact: ModelArtifact,
    pub metrics: EvalMetrics,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Split, fit on the train part, score on the test part
pub fn fit_and_evaluate(
    dataset: &Dataset,
    estimator: &EstimatorSpec,
    test_size: f64,
    seed: u64,
) -> Result<FitOutcome> {
    let (train_idx, test_idx) = train_test_split(dataset.len(), test_size, seed)?;
    let train = dataset.subset(&train_idx);
    let test = dataset.subset(&test_idx);

    let pipeline = Pipeline::fit(
        dataset.target.schema(),
        &train.records,
        &train.labels,
        estimator,
    )?;
    let artifact = ModelArtifact::new(dataset.target, pipeline);
    let metrics = score(&artifact, &test)?;

    Ok(FitOutcome {
        artifact,
        metrics,
        train_rows: train.len(),
        test_rows: test.len(),
    })
}

/// Metrics of `model` over every row of `dataset`
pub fn score(model: &dyn Regressor, dataset: &Dataset) -> Result<EvalMetrics> {
    let predictions = dataset
        .records
        .iter()
        .map(|r| model.predict(r))
        .collect::<Result<Vec<_>>>()?;
    Ok(EvalMetrics::compute(&predictions, &dataset.labels))
}

/// Train one target end to end and write its artifact and metadata
pub fn train_target(options: &TrainOptions) -> Result<TrainReport> {
    let start = Instant::now();
    let target = options.target;

    let dataset = Dataset::from_csv_path(target, &options.data)?;
    tracing::info!(
        target_model = %target,
        rows = dataset.len(),
        data = %options.data.display(),
        estimator = %options.estimator.kind(),
        "training"
    );

    let outcome = fit_and_evaluate(&dataset, &options.estimator, options.test_size, options.seed)?;

    ensure_dir(&options.model_dir)?;
    let artifact_path = options.artifact_path();
    save_artifact(
        &outcome.artifact,
        &artifact_path,
        &SaveConfig::new(options.format),
    )?;

    let metadata_path = options.metadata_path();
    let metadata = ModelMetadata::new(
        target.model_name(),
        outcome.artifact.metadata.features.clone(),
        outcome.metrics,
    );
    save_metadata(&metadata, &metadata_path)?;

    let m = outcome.metrics;
    tracing::info!(
        target_model = %target,
        mae = m.mae,
        rmse = m.rmse,
        r2 = m.r2,
        artifact = %artifact_path.display(),
        "training complete"
    );

    Ok(TrainReport {
        target,
        artifact_path,
        metadata_path,
        train_rows: outcome.train_rows,
        test_rows: outcome.test_rows,
        metrics: outcome.metrics,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
