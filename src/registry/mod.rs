//! Model registry
//!
//! Owns the two cached artifacts and their load lifecycle. Each target has
//! its own slot behind a `RwLock`:
//!
//! - `NotLoaded` until first access (or [`ModelRegistry::load_all`])
//! - `Loaded` with a shared handle once a load succeeds
//! - `Failed` with the error text once a load fails; the failure is sticky
//!   until [`ModelRegistry::reload`] or [`ModelRegistry::reload_target`]
//!
//! Handles are `Arc`s, so a reload never disturbs predictions already holding
//! the previous artifact.

mod source;


pub use source::{ArtifactSource, FsArtifactSource, ModelPaths};

use crate::pipeline::Regressor;
use crate::schema::Target;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Shared handle to a loaded artifact
pub type SharedModel = Arc<dyn Regressor>;

enum Slot {
    NotLoaded,
    Loaded(SharedModel),
    Failed(String),
}

/// Load state as reported by [`ModelRegistry::status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    NotLoaded,
    Loaded,
    Failed,
}

/// Status of one target's artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub target: Target,
    pub path: String,
    pub state: LoadState,
    pub error: Option<String>,
}

/// Registry of the hardness and oxidation artifacts
pub struct ModelRegistry {
    source: Box<dyn ArtifactSource>,
    hardness: RwLock<Slot>,
    oxidation: RwLock<Slot>,
}

impl ModelRegistry {
    /// Registry over an arbitrary artifact source; nothing is loaded yet
    pub fn new(source: impl ArtifactSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            hardness: RwLock::new(Slot::NotLoaded),
            oxidation: RwLock::new(Slot::NotLoaded),
        }
    }

    /// Registry reading `<dir>/hardness_model.json` and `<dir>/oxidation_model.json`
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(FsArtifactSource::new(ModelPaths::from_dir(dir)))
    }

    fn slot(&self, target: Target) -> &RwLock<Slot> {
        match target {
            Target::Hardness => &self.hardness,
            Target::Oxidation => &self.oxidation,
        }
    }

    fn write_slot(&self, target: Target) -> RwLockWriteGuard<'_, Slot> {
        self.slot(target)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the target's artifact, loading it on first access
    ///
    /// The error is the stored load failure text.
    pub fn ensure_loaded(&self, target: Target) -> Result<SharedModel, String> {
        {
            let slot = self
                .slot(target)
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match &*slot {
                Slot::Loaded(model) => return Ok(Arc::clone(model)),
                Slot::Failed(reason) => return Err(reason.clone()),
                Slot::NotLoaded => {}
            }
        }

        let mut slot = self.write_slot(target);
        // Another request may have loaded it while we waited for the lock
        if matches!(*slot, Slot::NotLoaded) {
            *slot = self.load(target);
        }
        match &*slot {
            Slot::Loaded(model) => Ok(Arc::clone(model)),
            Slot::Failed(reason) => Err(reason.clone()),
            Slot::NotLoaded => Err(format!("{} model was not loaded", target.display_name())),
        }
    }

    /// Load every target that is still `NotLoaded`
    pub fn load_all(&self) -> Vec<ModelStatus> {
        for target in Target::ALL {
            // Failures are recorded in the slot
            let _ = self.ensure_loaded(target);
        }
        self.status()
    }

    /// Re-read both artifacts, replacing cached models and errors
    pub fn reload(&self) -> Vec<ModelStatus> {
        Target::ALL
            .into_iter()
            .map(|target| self.reload_target(target))
            .collect()
    }

    /// Re-read one artifact
    pub fn reload_target(&self, target: Target) -> ModelStatus {
        let fresh = self.load(target);
        *self.write_slot(target) = fresh;
        self.status_of(target)
    }

    /// Current state of both targets; never triggers a load
    pub fn status(&self) -> Vec<ModelStatus> {
        Target::ALL
            .into_iter()
            .map(|target| self.status_of(target))
            .collect()
    }

    fn status_of(&self, target: Target) -> ModelStatus {
        let slot = self
            .slot(target)
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let (state, error) = match &*slot {
            Slot::NotLoaded => (LoadState::NotLoaded, None),
            Slot::Loaded(_) => (LoadState::Loaded, None),
            Slot::Failed(reason) => (LoadState::Failed, Some(reason.clone())),
        };
        ModelStatus {
            target,
            path: self.source.location(target),
            state,
            error,
        }
    }

    fn load(&self, target: Target) -> Slot {
        match self.source.load(target) {
            Ok(model) => {
                tracing::info!(
                    target_model = %target,
                    location = %self.source.location(target),
                    model = %model.describe(),
                    "model loaded"
                );
                Slot::Loaded(model)
            }
            Err(e) => {
                tracing::warn!(
                    target_model = %target,
                    location = %self.source.location(target),
                    error = %e,
                    "model load failed"
                );
                Slot::Failed(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("status", &self.status())
            .finish()
    }
}
