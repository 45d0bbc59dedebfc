//! Where artifacts come from

use super::SharedModel;
use crate::io::load_artifact;
use crate::schema::Target;
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads the artifact for a target
pub trait ArtifactSource: Send + Sync {
    fn load(&self, target: Target) -> Result<SharedModel>;

    /// Human-readable location, reported in model status
    fn location(&self, target: Target) -> String;
}

/// Fixed artifact paths for both targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub hardness: PathBuf,
    pub oxidation: PathBuf,
}

impl ModelPaths {
    /// Artifact files inside `dir`
    ///
    /// Each target uses the first existing `{target}_model.json`,
    /// `{target}_model.yaml` or `{target}_model.yml`, falling back to the
    /// `.json` name when none exists yet.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            hardness: resolve_in(dir, Target::Hardness),
            oxidation: resolve_in(dir, Target::Oxidation),
        }
    }

    pub fn get(&self, target: Target) -> &Path {
        match target {
            Target::Hardness => &self.hardness,
            Target::Oxidation => &self.oxidation,
        }
    }
}

fn resolve_in(dir: &Path, target: Target) -> PathBuf {
    let default = dir.join(target.artifact_file_name());
    ["json", "yaml", "yml"]
        .iter()
        .map(|ext| dir.join(format!("{}_model.{ext}", target.as_str())))
        .find(|path| path.is_file())
        .unwrap_or(default)
}

/// Reads artifacts from disk with [`load_artifact`]
#[derive(Debug, Clone)]
pub struct FsArtifactSource {
    paths: ModelPaths,
}

impl FsArtifactSource {
    pub fn new(paths: ModelPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ModelPaths {
        &self.paths
    }
}

impl ArtifactSource for FsArtifactSource {
    fn load(&self, target: Target) -> Result<SharedModel> {
        let artifact = load_artifact(self.paths.get(target))?;
        artifact.check_target(target)?;
        Ok(Arc::new(artifact))
    }

    fn location(&self, target: Target) -> String {
        self.paths.get(target).display().to_string()
    }
}
