//! AlgoVerse LLM Provider Layer
//!
//! Pluggable model providers and the generation client that drives them.
//!
//! # Architecture
//!
//! ```text
//! Topic → PromptTemplate → LlmProvider → raw response text
//! ```
//!
//! Providers are selected by an explicit [`ProviderConfig`] value and built
//! with [`build_provider`]; nothing is chosen at compile time.
//!
//! # Providers
//!
//! - `GroqProvider`: OpenAI-compatible chat completions API (Groq by default)
//! - `OllamaProvider`: Local Ollama API integration
//! - `MockProvider`: Deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use algoverse_llm::{GenerationClient, MockProvider};
//! use algoverse_domain::Topic;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), algoverse_llm::LlmError> {
//! let client = GenerationClient::new(Arc::new(MockProvider::new("<code-file>x</code-file>")));
//! let raw = client.generate(&Topic::parse("BinarySearch").unwrap()).await?;
//! assert_eq!(raw, "<code-file>x</code-file>");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod groq;
pub mod ollama;
pub mod prompt;
mod retry;

use algoverse_domain::Topic;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

pub use config::{build_provider, ApiKey, ProviderConfig};
pub use groq::GroqProvider;
pub use ollama::OllamaProvider;
pub use prompt::PromptTemplate;
pub use retry::MAX_ATTEMPTS_LIMIT;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credentials missing or refused
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider or prompt configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::Timeout(_) | LlmError::RateLimitExceeded
        )
    }
}

/// A text-generation backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Short provider identifier (e.g. `groq`)
    fn name(&self) -> &'static str;

    /// Model the provider talks to
    fn model(&self) -> &str;
}

/// Renders the prompt for a topic and asks a provider for a response
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn LlmProvider>,
    template: PromptTemplate,
}

impl GenerationClient {
    /// Create a client using the default prompt template
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            template: PromptTemplate::default(),
        }
    }

    /// Build the provider described by `config`
    pub fn from_config(config: &ProviderConfig) -> Result<Self, LlmError> {
        Ok(Self::new(build_provider(config)?))
    }

    /// Replace the prompt template
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Provider identifier
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Model name
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Generate the raw response for a topic
    ///
    /// Provider errors are returned unchanged.
    pub async fn generate(&self, topic: &Topic) -> Result<String, LlmError> {
        let prompt = self.template.render(topic);
        info!(
            "Generating '{}' with {} ({})",
            topic,
            self.provider.name(),
            self.provider.model()
        );
        debug!("Prompt length: {} chars", prompt.len());

        let response = self.provider.generate(&prompt).await?;

        debug!("LLM response length: {} chars", response.len());
        Ok(response)
    }
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network
/// calls. Responses can be keyed on a fragment of the prompt, so a mock can
/// answer differently per topic.
///
/// # Examples
///
/// ```
/// use algoverse_llm::{LlmProvider, MockProvider};
///
/// # async fn example() {
/// let mut provider = MockProvider::new("Fixed response");
/// provider.add_response("Heap Sort", "heap page");
/// assert_eq!(provider.generate("teach me Heap Sort").await.unwrap(), "heap page");
/// assert_eq!(provider.generate("anything else").await.unwrap(), "Fixed response");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Answer prompts containing `fragment` with `response`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(fragment.into(), MockReply::Text(response.into()));
    }

    /// Fail prompts containing `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        lock(&self.responses).insert(fragment.into(), MockReply::Error);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    /// The most recent prompt received
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.last_prompt).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        *lock(&self.call_count) += 1;
        *lock(&self.last_prompt) = Some(prompt.to_string());

        // Longest matching fragment wins so overlapping keys are deterministic
        let responses = lock(&self.responses);
        let reply = responses
            .iter()
            .filter(|(fragment, _)| prompt.contains(fragment.as_str()))
            .max_by_key(|(fragment, _)| fragment.len())
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Text(response)) => Ok(response),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("say hello").await.unwrap(), "world");
        assert_eq!(provider.generate("foo").await.unwrap(), "bar");
        assert_eq!(provider.generate("unknown").await.unwrap(), "Default mock response");
    }

    #[tokio::test]
    async fn test_mock_provider_longest_fragment_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("Search", "generic");
        provider.add_response("BinarySearch", "binary");

        assert_eq!(provider.generate("BinarySearch page").await.unwrap(), "binary");
        assert_eq!(provider.generate("LinearSearch page").await.unwrap(), "generic");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate("prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt().as_deref(), Some("prompt2"));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad");

        let result = provider.generate("bad prompt").await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generation_client_renders_topic() {
        let mock = MockProvider::new("<code-file>x</code-file>");
        let client = GenerationClient::new(Arc::new(mock.clone()));

        let topic = Topic::parse("KMP").unwrap();
        let raw = client.generate(&topic).await.unwrap();

        assert_eq!(raw, "<code-file>x</code-file>");
        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("KMP"));
        assert!(prompt.contains("<code-file name=\"KMP.jsx\">"));
        assert!(!prompt.contains("{algorithm}"));
        assert_eq!(client.provider_name(), "mock");
    }

    #[tokio::test]
    async fn test_generation_client_custom_template() {
        let mock = MockProvider::new("ok");
        let template = PromptTemplate::new("Teach {algorithm} please").unwrap();
        let client = GenerationClient::new(Arc::new(mock.clone())).with_template(template);

        client.generate(&Topic::parse("Dijkstra").unwrap()).await.unwrap();
        assert_eq!(mock.last_prompt().as_deref(), Some("Teach Dijkstra please"));
    }

    #[tokio::test]
    async fn test_generation_client_propagates_errors() {
        let mut mock = MockProvider::default();
        mock.add_error("Broken");
        let client = GenerationClient::new(Arc::new(mock));

        let result = client.generate(&Topic::parse("Broken").unwrap()).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[test]
    fn test_transient_errors() {
        assert!(LlmError::Communication("x".into()).is_transient());
        assert!(LlmError::Timeout(5).is_transient());
        assert!(LlmError::RateLimitExceeded.is_transient());
        assert!(!LlmError::Authentication("x".into()).is_transient());
        assert!(!LlmError::ModelNotAvailable("m".into()).is_transient());
    }
}
