//! Artifact saving

use super::artifact::ModelArtifact;
use super::format::{ModelFormat, SaveConfig};
use crate::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save an artifact to a file
///
/// The format comes from `config`, not from the path; callers pick a path
/// whose extension matches so that [`load_artifact`](super::load_artifact)
/// can detect it again.
///
/// # Example
///
/// ```no_run
/// use weldpredict::io::{save_artifact, ModelArtifact, ModelFormat, SaveConfig};
///
/// # fn demo(artifact: &ModelArtifact) -> weldpredict::Result<()> {
/// save_artifact(artifact, "models/hardness_model.json", &SaveConfig::new(ModelFormat::Json))?;
/// # Ok(())
/// # }
/// ```
pub fn save_artifact(
    artifact: &ModelArtifact,
    path: impl AsRef<Path>,
    config: &SaveConfig,
) -> Result<()> {
    let path = path.as_ref();

    let data = match config.format {
        ModelFormat::Json => {
            if config.pretty {
                serde_json::to_string_pretty(artifact)
            } else {
                serde_json::to_string(artifact)
            }
            .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?
        }
        ModelFormat::Yaml => serde_yaml::to_string(artifact)
            .map_err(|e| Error::Serialization(format!("YAML serialization failed: {e}")))?,
    };

    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fitted_artifact;
    use crate::schema::Target;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_artifact_json() {
        let artifact = fitted_artifact(Target::Hardness);
        let temp_file = NamedTempFile::new().unwrap();
        save_artifact(&artifact, temp_file.path(), &SaveConfig::new(ModelFormat::Json)).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("Hardness Model"));
        assert!(content.contains("\"linear\""));
    }

    #[test]
    fn test_save_artifact_yaml() {
        let artifact = fitted_artifact(Target::Oxidation);
        let temp_file = NamedTempFile::new().unwrap();
        save_artifact(&artifact, temp_file.path(), &SaveConfig::new(ModelFormat::Yaml)).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("Oxidation Model"));
        assert!(content.contains("Soaking_Time"));
    }

    #[test]
    fn test_save_artifact_json_compact() {
        let artifact = fitted_artifact(Target::Hardness);
        let config = SaveConfig::new(ModelFormat::Json).with_pretty(false);

        let temp_file = NamedTempFile::new().unwrap();
        save_artifact(&artifact, temp_file.path(), &config).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_save_artifact_missing_directory() {
        let artifact = fitted_artifact(Target::Hardness);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("hardness_model.json");
        let err = save_artifact(&artifact, &path, &SaveConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
