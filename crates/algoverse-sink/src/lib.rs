//! AlgoVerse Artifact Sinks
//!
//! Implements the `ArtifactSink` trait from `algoverse-domain`.
//!
//! # Sinks
//!
//! - `FsSink`: writes artifacts into a directory, by default through a
//!   temporary file that is renamed over the target
//! - `MemorySink`: keeps artifacts in memory (tests, dry runs)
//!
//! Both overwrite existing artifacts: the last successful write wins.
//!
//! # Examples
//!
//! ```no_run
//! use algoverse_domain::{Artifact, ArtifactSink};
//! use algoverse_sink::FsSink;
//!
//! let sink = FsSink::new("generated");
//! let path = sink.write(&Artifact::new("BinarySearch.jsx", "export default 1;")).unwrap();
//! assert!(path.ends_with("BinarySearch.jsx"));
//! ```

#![warn(missing_docs)]

use algoverse_domain::{Artifact, ArtifactSink};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while storing artifacts
#[derive(Error, Debug)]
pub enum SinkError {
    /// Filename is not a safe bare name
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    /// Underlying I/O failure
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Cause
        #[source]
        source: std::io::Error,
    },
}

/// Check that `filename` is a bare name that cannot escape the sink root
///
/// Rejects empty names, path separators, NUL, `.`/`..` and hidden files.
pub fn validate_filename(filename: &str) -> Result<(), SinkError> {
    let bad = filename.is_empty()
        || filename.starts_with('.')
        || filename.contains(['/', '\\', '\0'])
        || Path::new(filename).is_absolute();

    if bad {
        return Err(SinkError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
    atomic: bool,
}

impl FsSink {
    /// Create a sink rooted at `root`, using atomic replacement
    ///
    /// The directory is created on first write.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            atomic: true,
        }
    }

    /// Choose between temp-file-then-rename (`true`) and direct writes
    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Directory artifacts are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether writes go through a temporary file
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Where `filename` would be written
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, SinkError> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SinkError + '_ {
        move |source| SinkError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write_atomic(&self, target: &Path, text: &str) -> Result<(), SinkError> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".algoverse-")
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(Self::io_error(&self.root))?;

        tmp.write_all(text.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(Self::io_error(tmp.path()))?;

        tmp.persist(target)
            .map_err(|e| Self::io_error(target)(e.error))?;
        Ok(())
    }
}

impl ArtifactSink for FsSink {
    type Error = SinkError;

    fn write(&self, artifact: &Artifact) -> Result<PathBuf, Self::Error> {
        let target = self.path_for(&artifact.filename)?;

        std::fs::create_dir_all(&self.root).map_err(Self::io_error(&self.root))?;

        if self.atomic {
            self.write_atomic(&target, &artifact.text)?;
        } else {
            std::fs::write(&target, artifact.text.as_bytes()).map_err(Self::io_error(&target))?;
        }

        info!(
            "File '{}' has been written ({} bytes)",
            target.display(),
            artifact.len()
        );
        Ok(target)
    }
}

/// Keeps artifacts in memory, keyed by filename
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<HashMap<String, String>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents stored under `filename`
    pub fn get(&self, filename: &str) -> Option<String> {
        self.lock().get(filename).cloned()
    }

    /// Number of stored artifacts
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Stored filenames, sorted
    pub fn filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.artifacts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArtifactSink for MemorySink {
    type Error = SinkError;

    fn write(&self, artifact: &Artifact) -> Result<PathBuf, Self::Error> {
        validate_filename(&artifact.filename)?;
        self.lock()
            .insert(artifact.filename.clone(), artifact.text.clone());
        debug!("Stored '{}' in memory", artifact.filename);
        Ok(PathBuf::from(&artifact.filename))
    }
}
