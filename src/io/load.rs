//! Artifact loading

use super::artifact::ModelArtifact;
use super::format::ModelFormat;
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Load an artifact from a file
///
/// The format is detected from the file extension. A path that does not exist
/// yields [`Error::ModelNotFound`].
///
/// # Example
///
/// ```no_run
/// use weldpredict::io::load_artifact;
///
/// let artifact = load_artifact("models/hardness_model.json").unwrap();
/// println!("Loaded model: {}", artifact.metadata.name);
/// ```
pub fn load_artifact(path: impl AsRef<Path>) -> Result<ModelArtifact> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::ModelNotFound(path.to_path_buf()));
    }

    let format = ModelFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;

    let artifact = match format {
        ModelFormat::Json => serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?,
        ModelFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| Error::Serialization(format!("YAML deserialization failed: {e}")))?,
    };

    Ok(artifact)
}
