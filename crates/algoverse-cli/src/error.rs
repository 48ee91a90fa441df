//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] algoverse_server::config::ConfigError),

    /// Dispatcher could not be built
    #[error(transparent)]
    Setup(#[from] algoverse_server::ServerError),

    /// Generation request failed
    #[error(transparent)]
    Dispatch(#[from] algoverse_server::dispatcher::DispatchError),

    /// Topic or extractor options rejected
    #[error(transparent)]
    Extractor(#[from] algoverse_extractor::ExtractorError),

    /// Artifact could not be written
    #[error(transparent)]
    Sink(#[from] algoverse_sink::SinkError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
