//! Model artifact structure for serialization

use crate::pipeline::{EstimatorKind, Pipeline, Regressor};
use crate::schema::{FeatureRecord, Target};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Descriptive header stored alongside the fitted pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Model name (e.g. "Hardness Model")
    pub name: String,

    /// Prediction target the pipeline was fit for
    pub target: Target,

    /// Estimator family
    pub estimator: EstimatorKind,

    /// Feature names in pipeline order
    pub features: Vec<String>,

    /// Label column the pipeline was fit against
    pub label: String,

    /// Crate version that wrote the artifact
    pub version: String,
}

impl ArtifactMetadata {
    /// Metadata for a freshly fit pipeline
    pub fn new(target: Target, estimator: EstimatorKind) -> Self {
        Self {
            name: target.model_name().to_string(),
            target,
            estimator,
            features: target
                .schema()
                .field_names()
                .into_iter()
                .map(String::from)
                .collect(),
            label: target.label_column().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A fitted pipeline plus its header; the unit written to and read from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ArtifactMetadata,
    pub pipeline: Pipeline,
}

impl ModelArtifact {
    pub fn new(target: Target, pipeline: Pipeline) -> Self {
        Self {
            metadata: ArtifactMetadata::new(target, pipeline.estimator.kind()),
            pipeline,
        }
    }

    pub fn target(&self) -> Target {
        self.metadata.target
    }

    /// Check that this artifact serves `target` with that target's schema
    pub fn check_target(&self, target: Target) -> Result<()> {
        if self.metadata.target != target {
            return Err(Error::Serialization(format!(
                "artifact was trained for {}, not {target}",
                self.metadata.target
            )));
        }

        let expected = target.schema().field_names();
        if self.pipeline.features != expected {
            return Err(Error::FeatureMismatch {
                expected: expected.into_iter().map(String::from).collect(),
                got: self.pipeline.features.clone(),
            });
        }
        Ok(())
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        self.pipeline.predict_record(record)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.metadata.name, self.pipeline.describe())
    }
}
