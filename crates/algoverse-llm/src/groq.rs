//! Groq Provider Implementation
//!
//! Talks to any OpenAI-compatible chat completions endpoint; the defaults
//! point at Groq's hosted API. The prompt is sent as a single user message.

use crate::config::ApiKey;
use crate::retry::with_retries;
use crate::{LlmError, LlmProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default timeout for LLM requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat completions provider
pub struct GroqProvider {
    endpoint: String,
    model: String,
    api_key: ApiKey,
    client: reqwest::Client,
    timeout_secs: u64,
    max_attempts: u32,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqProvider {
    /// Create a provider for `endpoint` and `model`
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: ApiKey,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::Authentication("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            client,
            timeout_secs,
            max_attempts: 1,
            temperature: None,
        })
    }

    /// Groq's hosted endpoint with the default model
    pub fn hosted(api_key: ApiKey) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, api_key, DEFAULT_TIMEOUT_SECS)
    }

    /// Set the maximum number of attempts for transient failures
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    LlmError::Communication(format!("Unable to reach {}: {}", self.endpoint, e))
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status.as_u16(), &self.model, &error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        first_choice(body)
    }
}

fn status_error(status: u16, model: &str, body: &str) -> LlmError {
    match status {
        401 | 403 => LlmError::Authentication(format!("HTTP {}: {}", status, body)),
        404 => LlmError::ModelNotAvailable(model.to_string()),
        429 => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

fn first_choice(body: ChatResponse) -> Result<String, LlmError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        with_retries("groq", self.max_attempts, || self.generate_once(prompt)).await
    }

    fn name(&self) -> &'static str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("gsk_test")
    }

    #[test]
    fn test_hosted_defaults() {
        let provider = GroqProvider::hosted(key()).unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.max_attempts, 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = GroqProvider::hosted(ApiKey::new(""));
        assert!(matches!(result, Err(LlmError::Authentication(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let provider = GroqProvider::hosted(key()).unwrap().with_temperature(0.2);
        let json = serde_json::to_value(provider.request_body("Teach KMP")).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Teach KMP");
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let provider = GroqProvider::hosted(key()).unwrap();
        let json = serde_json::to_value(provider.request_body("x")).unwrap();
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_parse_response() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"<code-file>x</code-file>"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(body).unwrap(), "<code-file>x</code-file>");
    }

    #[test]
    fn test_parse_empty_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice(body), Err(LlmError::InvalidResponse(_))));

        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(matches!(first_choice(body), Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(status_error(401, "m", ""), LlmError::Authentication(_)));
        assert!(matches!(status_error(403, "m", ""), LlmError::Authentication(_)));
        assert!(matches!(status_error(404, "m", ""), LlmError::ModelNotAvailable(m) if m == "m"));
        assert!(matches!(status_error(429, "m", ""), LlmError::RateLimitExceeded));
        assert!(matches!(status_error(503, "m", "busy"), LlmError::Communication(msg) if msg.contains("busy")));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let provider = GroqProvider::new("http://127.0.0.1:9/v1/chat/completions", "m", key(), 5).unwrap();
        let result = provider.generate("hi").await;
        assert!(matches!(
            result,
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires GROQ_API_KEY and network access
    async fn test_groq_generate_integration() {
        let key = std::env::var(DEFAULT_API_KEY_ENV).unwrap();
        let provider = GroqProvider::hosted(ApiKey::new(key)).unwrap();
        let response = provider.generate("Say 'hello' and nothing else").await.unwrap();
        assert!(!response.is_empty());
    }
}
