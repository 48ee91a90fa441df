//! AlgoVerse Extractor
//!
//! Turns a model-generated response into a clean source artifact.
//!
//! # Overview
//!
//! The generation prompt asks the model to answer with up to three tagged
//! sections:
//!
//! ```text
//! <explanation> ... </explanation>
//! <dependencies> ... </dependencies>        (or <dependencies-file>)
//! <code-file name="BinarySearch.jsx"> ... </code-file>
//! ```
//!
//! Models do not always comply. The Extractor treats the response as
//! untrusted text and is total: it never fails on any input. Missing or
//! malformed sections degrade to an empty artifact and a list of
//! [`ExtractionWarning`]s.
//!
//! # Pipeline
//!
//! ```text
//! raw text → trim → scan tags → drop explanation/dependencies
//!          → take first code-file (trimmed) → collapse blank lines
//!          → artifact + "<topic>.jsx"
//! ```
//!
//! Tags are matched by a linear-time state machine ([`TagScanner`]), not by
//! regular expressions, so malformed markup fails predictably.
//!
//! # Example Usage
//!
//! ```
//! use algoverse_extractor::Extractor;
//!
//! let extractor = Extractor::default();
//! let raw = "<explanation>hi</explanation>\
//!            <code-file name=\"x.jsx\">const a=1;\n\n\n\nexport default a;</code-file>";
//!
//! let result = extractor.extract_named(raw, "BinarySearch").unwrap();
//! assert_eq!(result.artifact_text, "const a=1;\n\nexport default a;");
//! assert_eq!(result.filename, "BinarySearch.jsx");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod scanner;
mod sections;
mod types;


pub use config::{
    ExtractorConfig, MissingCodePolicy, TopicPolicy, DEFAULT_EXTENSION,
    DEFAULT_MAX_RESPONSE_BYTES,
};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use scanner::{scan, ScanOutput, TagScanner};
pub use sections::{
    collapse_blank_lines, derive_filename, extract_code, parse_dependencies, remove_section,
};
pub use types::{ExtractionResult, ExtractionWarning, TagKind, TagSpan};

/// Extract with the default configuration
///
/// Convenience wrapper around [`Extractor::extract_named`].
pub fn extract(raw_response: &str, topic_name: &str) -> Result<ExtractionResult, ExtractorError> {
    Extractor::default().extract_named(raw_response, topic_name)
}
