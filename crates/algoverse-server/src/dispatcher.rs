//! Request dispatching: topic in, file out.
//!
//! One request runs generation, extraction and the sink write in sequence
//! and reports the first error encountered.

use crate::config::ServerConfig;
use crate::ServerError;
use algoverse_domain::{ArtifactSink, RequestId};
use algoverse_extractor::{Extractor, ExtractorError};
use algoverse_llm::{GenerationClient, LlmError, PromptTemplate};
use algoverse_sink::{FsSink, SinkError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

/// Sink shared between requests
pub type SharedSink = Arc<dyn ArtifactSink<Error = SinkError> + Send + Sync>;

/// Errors surfaced to the caller of [`Dispatcher::make`]
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Topic name cannot be used as a filename
    #[error(transparent)]
    Topic(#[from] ExtractorError),

    /// The model call failed
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    /// The artifact could not be stored
    #[error("Write failed: {0}")]
    Sink(#[from] SinkError),

    /// The blocking write task panicked or was cancelled
    #[error("Write task failed: {0}")]
    Join(String),
}

/// Successful result of one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeOutcome {
    /// Request identifier (UUIDv7)
    pub request_id: String,
    /// Resolved topic
    pub topic: String,
    /// Artifact filename
    pub filename: String,
    /// Where the sink stored it
    pub path: PathBuf,
    /// Size of the stored artifact
    pub bytes_written: usize,
    /// `name` attribute the model put on the code-file tag
    pub declared_name: Option<String>,
    /// Explanation section, if any
    pub explanation: Option<String>,
    /// Declared npm dependencies
    pub dependencies: Vec<String>,
    /// Extraction warnings
    pub warnings: Vec<String>,
}

/// Runs generate, extract and write for each topic
#[derive(Clone)]
pub struct Dispatcher {
    client: GenerationClient,
    extractor: Extractor,
    sink: SharedSink,
}

impl Dispatcher {
    /// Assemble a dispatcher from its parts
    pub fn new(client: GenerationClient, extractor: Extractor, sink: SharedSink) -> Self {
        Self {
            client,
            extractor,
            sink,
        }
    }

    /// Build the provider, prompt, extractor and file sink described by
    /// `config`
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let mut client = GenerationClient::from_config(&config.provider)?;
        if let Some(path) = &config.prompt_file {
            client = client.with_template(PromptTemplate::from_file(path)?);
        }

        let extractor = Extractor::try_new(config.extractor.clone())?;
        let sink = FsSink::new(&config.output_dir).with_atomic(config.atomic_writes);

        Ok(Self::new(client, extractor, Arc::new(sink)))
    }

    /// Provider identifier
    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    /// Model name
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Generate, extract and store the page for `topic_name`
    pub async fn make(&self, topic_name: &str) -> Result<MakeOutcome, DispatchError> {
        let request_id = RequestId::new();
        let span = info_span!("make", request_id = %request_id);

        async move {
            let topic = self.extractor.resolve_topic(topic_name)?;
            let raw = self.client.generate(&topic).await?;

            let result = self.extractor.extract(&raw, &topic);
            if result.is_empty() {
                warn!("Writing empty artifact for '{}'", topic);
            }

            let artifact = result.artifact();
            let bytes_written = artifact.len();
            let sink = Arc::clone(&self.sink);
            let path = tokio::task::spawn_blocking(move || sink.write(&artifact))
                .await
                .map_err(|e| DispatchError::Join(e.to_string()))??;

            info!("Request for '{}' complete", topic);

            Ok(MakeOutcome {
                request_id: request_id.to_string(),
                topic: topic.to_string(),
                warnings: result.warning_messages(),
                filename: result.filename,
                path,
                bytes_written,
                declared_name: result.declared_name,
                explanation: result.explanation,
                dependencies: result.dependencies,
            })
        }
        .instrument(span)
        .await
    }
}
