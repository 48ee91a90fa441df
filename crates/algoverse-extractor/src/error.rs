//! Error types for the Extractor

use algoverse_domain::TopicError;
use thiserror::Error;

/// Errors that can occur around extraction
///
/// Malformed or missing tags are never errors; they surface as
/// [`crate::ExtractionWarning`]s on the result.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Topic name cannot be turned into a safe filename
    #[error("Unsafe topic name: {0}")]
    Topic(#[from] TopicError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
