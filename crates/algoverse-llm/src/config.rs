//! Provider selection
//!
//! The model provider is an explicit configuration value, typically the
//! `[provider]` table of a TOML file:
//!
//! ```toml
//! [provider]
//! kind = "groq"
//! model = "llama-3.3-70b-versatile"
//! api_key_env = "GROQ_API_KEY"
//! ```

use crate::{
    groq, ollama, GroqProvider, LlmError, LlmProvider, MockProvider, OllamaProvider,
    MAX_ATTEMPTS_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// API credential that never shows up in logs
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the key is blank
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Which model backend to use, with its endpoint, credentials and model name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// OpenAI-compatible chat completions (Groq by default)
    Groq {
        /// Chat completions URL
        #[serde(default = "default_groq_endpoint")]
        endpoint: String,
        /// Model name
        #[serde(default = "default_groq_model")]
        model: String,
        /// Inline key; takes precedence over `api_key_env`
        #[serde(default)]
        api_key: Option<ApiKey>,
        /// Environment variable holding the key
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        /// Request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
        /// Attempts per request; 1 disables retry
        #[serde(default = "default_max_attempts")]
        max_attempts: u32,
        /// Sampling temperature
        #[serde(default)]
        temperature: Option<f32>,
    },

    /// Local Ollama server
    Ollama {
        /// Base URL
        #[serde(default = "default_ollama_endpoint")]
        endpoint: String,
        /// Model name
        model: String,
        /// Request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
        /// Attempts per request; 1 disables retry
        #[serde(default = "default_max_attempts")]
        max_attempts: u32,
    },

    /// Canned response, for tests and offline demos
    Mock {
        /// Text returned for every prompt
        #[serde(default)]
        response: String,
    },
}

fn default_groq_endpoint() -> String {
    groq::DEFAULT_ENDPOINT.to_string()
}

fn default_groq_model() -> String {
    groq::DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    groq::DEFAULT_API_KEY_ENV.to_string()
}

fn default_ollama_endpoint() -> String {
    ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    groq::DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    1
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Groq {
            endpoint: default_groq_endpoint(),
            model: default_groq_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            temperature: None,
        }
    }
}

impl ProviderConfig {
    /// Provider identifier, matching [`LlmProvider::name`]
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderConfig::Groq { .. } => "groq",
            ProviderConfig::Ollama { .. } => "ollama",
            ProviderConfig::Mock { .. } => "mock",
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ProviderConfig::Groq {
                endpoint,
                model,
                timeout_secs,
                max_attempts,
                ..
            }
            | ProviderConfig::Ollama {
                endpoint,
                model,
                timeout_secs,
                max_attempts,
            } => {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    return Err(format!("endpoint '{}' must be an http(s) URL", endpoint));
                }
                if model.trim().is_empty() {
                    return Err("model must not be empty".to_string());
                }
                if *timeout_secs == 0 {
                    return Err("timeout_secs must be greater than 0".to_string());
                }
                if !(1..=MAX_ATTEMPTS_LIMIT).contains(max_attempts) {
                    return Err(format!(
                        "max_attempts must be between 1 and {}, got {}",
                        MAX_ATTEMPTS_LIMIT, max_attempts
                    ));
                }
                Ok(())
            }
            ProviderConfig::Mock { .. } => Ok(()),
        }
    }

    /// Resolve the Groq key: inline value first, then the environment
    fn resolve_api_key(
        api_key: &Option<ApiKey>,
        api_key_env: &str,
    ) -> Result<ApiKey, LlmError> {
        if let Some(key) = api_key.as_ref().filter(|key| !key.is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(api_key_env)
            .ok()
            .map(ApiKey::new)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                LlmError::Authentication(format!(
                    "no API key configured and ${} is not set",
                    api_key_env
                ))
            })
    }
}

/// Build the provider described by `config`
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    config.validate().map_err(LlmError::Config)?;

    let provider: Arc<dyn LlmProvider> = match config {
        ProviderConfig::Groq {
            endpoint,
            model,
            api_key,
            api_key_env,
            timeout_secs,
            max_attempts,
            temperature,
        } => {
            let key = ProviderConfig::resolve_api_key(api_key, api_key_env)?;
            let mut provider = GroqProvider::new(endpoint.clone(), model.clone(), key, *timeout_secs)?
                .with_max_attempts(*max_attempts);
            if let Some(temperature) = temperature {
                provider = provider.with_temperature(*temperature);
            }
            Arc::new(provider)
        }
        ProviderConfig::Ollama {
            endpoint,
            model,
            timeout_secs,
            max_attempts,
        } => Arc::new(
            OllamaProvider::with_timeout(endpoint.clone(), model.clone(), *timeout_secs)?
                .with_max_attempts(*max_attempts),
        ),
        ProviderConfig::Mock { response } => Arc::new(MockProvider::new(response.clone())),
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_groq() {
        let config = ProviderConfig::default();
        assert_eq!(config.kind(), "groq");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_groq_with_defaults() {
        let config: ProviderConfig = toml::from_str(r#"kind = "groq""#).unwrap();
        assert_eq!(config, ProviderConfig::default());
    }

    #[test]
    fn test_parse_ollama() {
        let config: ProviderConfig = toml::from_str(
            r#"
            kind = "ollama"
            model = "qwen2.5-coder"
            max_attempts = 3
            "#,
        )
        .unwrap();

        match config {
            ProviderConfig::Ollama {
                endpoint,
                model,
                timeout_secs,
                max_attempts,
            } => {
                assert_eq!(endpoint, ollama::DEFAULT_ENDPOINT);
                assert_eq!(model, "qwen2.5-coder");
                assert_eq!(timeout_secs, 120);
                assert_eq!(max_attempts, 3);
            }
            other => panic!("expected ollama, got {:?}", other),
        }
    }

    #[test]
    fn test_ollama_requires_model() {
        assert!(toml::from_str::<ProviderConfig>(r#"kind = "ollama""#).is_err());
    }

    #[test]
    fn test_unknown_kind() {
        assert!(toml::from_str::<ProviderConfig>(r#"kind = "openai-legacy""#).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ProviderConfig::Ollama {
            endpoint: "localhost:11434".to_string(),
            model: "m".to_string(),
            timeout_secs: 10,
            max_attempts: 1,
        };
        assert!(config.validate().is_err());

        let config = ProviderConfig::Ollama {
            endpoint: "http://localhost:11434".to_string(),
            model: "m".to_string(),
            timeout_secs: 0,
            max_attempts: 1,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_max_attempts() {
        let attempts = |max_attempts| ProviderConfig::Ollama {
            endpoint: "http://localhost:11434".to_string(),
            model: "m".to_string(),
            timeout_secs: 10,
            max_attempts,
        };
        assert!(attempts(1).validate().is_ok());
        assert!(attempts(MAX_ATTEMPTS_LIMIT).validate().is_ok());
        assert!(attempts(0).validate().is_err());
        assert!(attempts(70).validate().is_err());

        let config: ProviderConfig = toml::from_str(
            r#"
            kind = "groq"
            max_attempts = 70
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
        assert!(matches!(build_provider(&config), Err(LlmError::Config(_))));
    }

    #[test]
    fn test_api_key_hidden_in_debug() {
        let config = ProviderConfig::Groq {
            endpoint: default_groq_endpoint(),
            model: default_groq_model(),
            api_key: Some(ApiKey::new("gsk_secret")),
            api_key_env: default_api_key_env(),
            timeout_secs: 10,
            max_attempts: 1,
            temperature: None,
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("ApiKey(***)"));
    }

    #[test]
    fn test_build_groq_with_inline_key() {
        let config = ProviderConfig::Groq {
            endpoint: default_groq_endpoint(),
            model: "llama-3.1-8b-instant".to_string(),
            api_key: Some(ApiKey::new("gsk_inline")),
            api_key_env: "ALGOVERSE_TEST_UNSET_KEY".to_string(),
            timeout_secs: 10,
            max_attempts: 1,
            temperature: Some(0.3),
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_build_groq_missing_key() {
        let config = ProviderConfig::Groq {
            endpoint: default_groq_endpoint(),
            model: default_groq_model(),
            api_key: None,
            api_key_env: "ALGOVERSE_TEST_UNSET_KEY".to_string(),
            timeout_secs: 10,
            max_attempts: 1,
            temperature: None,
        };
        assert!(matches!(build_provider(&config), Err(LlmError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_build_mock() {
        let config = ProviderConfig::Mock {
            response: "<code-file>x</code-file>".to_string(),
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "mock");
        assert_eq!(provider.generate("any").await.unwrap(), "<code-file>x</code-file>");
    }
}
