//! Artifact module - the sanitized output handed to a sink

/// A generated source file ready to be persisted
///
/// `filename` is always a bare name derived from a [`crate::Topic`], never a
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Bare filename, e.g. `BinarySearch.jsx`
    pub filename: String,

    /// File contents
    pub text: String,
}

impl Artifact {
    /// Create a new artifact
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }

    /// Whether the artifact has no content
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Size of the contents in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }
}
