//! Model I/O - loading and saving artifacts
//!
//! An artifact is a fitted [`Pipeline`](crate::pipeline::Pipeline) plus a
//! header, stored as JSON or YAML. Each artifact may have a JSON metadata
//! sidecar with training metrics.

mod artifact;
mod format;
mod load;
mod metadata;
mod save;


pub use artifact::{ArtifactMetadata, ModelArtifact};
pub use format::{ModelFormat, SaveConfig};
pub use load::load_artifact;
pub use metadata::{load_metadata, save_metadata, ModelMetadata, TRAINED_AT_FORMAT};
pub use save::save_artifact;
