//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::Artifact;
use std::path::PathBuf;

/// Trait for persisting generated artifacts
///
/// Implemented by the infrastructure layer (algoverse-sink).
/// Writing the same filename twice overwrites: the last successful write wins.
pub trait ArtifactSink {
    /// Error type for sink operations
    type Error;

    /// Store the artifact, returning where it ended up
    fn write(&self, artifact: &Artifact) -> Result<PathBuf, Self::Error>;
}
