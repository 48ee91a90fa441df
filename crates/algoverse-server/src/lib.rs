//! AlgoVerse Server
//!
//! HTTP front end for page generation: `POST /make` takes an algorithm
//! name, asks the configured model for a teaching page, extracts the code
//! and writes it to the output directory.

#![warn(missing_docs)]

pub mod config;
pub mod dispatcher;
pub mod handlers;

use config::ServerConfig;
use dispatcher::Dispatcher;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Provider or prompt could not be set up
    #[error("Provider error: {0}")]
    Provider(#[from] algoverse_llm::LlmError),

    /// Extractor configuration rejected
    #[error("Extractor error: {0}")]
    Extractor(#[from] algoverse_extractor::ExtractorError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Builds the dispatcher from `config` and serves until the process exits.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting AlgoVerse server");
    info!("Bind address: {}", config.bind_addr());
    info!("Output directory: {}", config.output_dir.display());

    let dispatcher = Dispatcher::from_config(&config)?;
    info!(
        "Provider: {} ({})",
        dispatcher.provider_name(),
        dispatcher.model()
    );

    let state = AppState {
        dispatcher: Arc::new(dispatcher),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
