//! Metadata sidecar written next to each artifact

use crate::train::EvalMetrics;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Timestamp layout for `trained_at`
pub const TRAINED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Training summary for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub trained_at: String,
    pub features: Vec<String>,
    pub metrics: EvalMetrics,
}

impl ModelMetadata {
    /// Metadata stamped with the current time
    pub fn new(model_name: impl Into<String>, features: Vec<String>, metrics: EvalMetrics) -> Self {
        Self::at(model_name, features, metrics, Utc::now())
    }

    /// Metadata stamped with an explicit time
    pub fn at(
        model_name: impl Into<String>,
        features: Vec<String>,
        metrics: EvalMetrics,
        trained_at: DateTime<Utc>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            trained_at: trained_at.format(TRAINED_AT_FORMAT).to_string(),
            features,
            metrics,
        }
    }
}

/// Write metadata as pretty JSON
pub fn save_metadata(metadata: &ModelMetadata, path: impl AsRef<Path>) -> Result<()> {
    let data = serde_json::to_string_pretty(metadata)
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;
    fs::write(path, data)?;
    Ok(())
}

/// Read a metadata sidecar
pub fn load_metadata(path: impl AsRef<Path>) -> Result<ModelMetadata> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ModelNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn metrics() -> EvalMetrics {
        EvalMetrics {
            mae: 1.5,
            rmse: 2.0,
            r2: 0.9,
        }
    }

    #[test]
    fn test_trained_at_format() {
        let when = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let metadata = ModelMetadata::at("Hardness Model", vec!["Material".into()], metrics(), when);
        assert_eq!(metadata.trained_at, "2024-03-09 14:05:07 UTC");
    }

    #[test]
    fn test_sidecar_layout() {
        let metadata = ModelMetadata::new(
            "Oxidation Model",
            vec!["Material".into(), "Current".into()],
            metrics(),
        );
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["model_name"], "Oxidation Model");
        assert_eq!(json["features"][1], "Current");
        assert_eq!(json["metrics"]["RMSE"], 2.0);
        assert!(json["trained_at"].as_str().unwrap().ends_with(" UTC"));
    }

    #[test]
    fn test_save_and_load_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hardness_metadata.json");
        let metadata = ModelMetadata::new("Hardness Model", vec!["Material".into()], metrics());

        save_metadata(&metadata, &path).unwrap();
        let loaded = load_metadata(&path).unwrap();
        assert_eq!(loaded, metadata);
    }

    #[test]
    fn test_load_metadata_missing() {
        let err = load_metadata("/nonexistent/hardness_metadata.json").unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }
}
