//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Default artifact extension (stored without the dot)
pub const DEFAULT_EXTENSION: &str = "jsx";

/// Default cap on raw response size (1 MiB)
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// What to produce when a response has no `code-file` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCodePolicy {
    /// Empty artifact; the response is discarded
    Empty,
    /// The response with explanation and dependency sections removed
    CleanedResponse,
}

impl Default for MissingCodePolicy {
    fn default() -> Self {
        MissingCodePolicy::Empty
    }
}

/// How untrusted topic names are turned into filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicPolicy {
    /// Refuse names with characters outside `[A-Za-z0-9_-]`
    Reject,
    /// Replace disallowed characters with `_`
    Sanitize,
}

impl Default for TopicPolicy {
    fn default() -> Self {
        TopicPolicy::Reject
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Artifact file extension, without the leading dot
    pub extension: String,

    /// Raw responses longer than this are truncated before scanning
    pub max_response_bytes: usize,

    /// Behavior when no `code-file` section is present
    pub missing_code: MissingCodePolicy,

    /// Topic name handling
    pub topic_policy: TopicPolicy,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extension.is_empty() {
            return Err("extension must not be empty".to_string());
        }
        if self.extension.len() > 16 || !self.extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!(
                "extension '{}' must be 1-16 ASCII letters or digits",
                self.extension
            ));
        }
        if self.max_response_bytes == 0 {
            return Err("max_response_bytes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Lenient preset: sanitize topics and keep untagged responses
    pub fn lenient() -> Self {
        Self {
            missing_code: MissingCodePolicy::CleanedResponse,
            topic_policy: TopicPolicy::Sanitize,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            missing_code: MissingCodePolicy::Empty,
            topic_policy: TopicPolicy::Reject,
        }
    }
}
