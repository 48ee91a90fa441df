//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, output directory, the
//! model provider and extractor options.

use algoverse_extractor::ExtractorConfig;
use algoverse_llm::ProviderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (default: 8000)
    pub bind_port: u16,

    /// Directory generated pages are written to
    pub output_dir: PathBuf,

    /// Write through a temporary file and rename
    pub atomic_writes: bool,

    /// Custom prompt template; must contain `{algorithm}`
    pub prompt_file: Option<PathBuf>,

    /// Model provider
    pub provider: ProviderConfig,

    /// Extraction options
    pub extractor: ExtractorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            output_dir: PathBuf::from("generated"),
            atomic_writes: true,
            prompt_file: None,
            provider: ProviderConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".to_string()));
        }
        self.provider
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("provider: {}", e)))?;
        self.extractor
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("extractor: {}", e)))?;
        Ok(())
    }

    /// Offline configuration backed by the mock provider
    pub fn default_test_config() -> Self {
        ServerConfig {
            provider: ProviderConfig::Mock {
                response: "<code-file name=\"Demo.jsx\">export default function Demo() { return null; }</code-file>"
                    .to_string(),
            },
            ..ServerConfig::default()
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
