//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Unknown docstring formats and model identifiers are rejected while the
//! configuration is extracted, before any generation starts.

use serde::{Deserialize, Serialize};

use crate::ai::provider::BackendConfig;
use crate::constants::{batch, network, scan};
use crate::types::{DocError, DocstringFormat, GenerationConfig, ModelId, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Docstring content settings
    pub generation: GenerationSettings,

    /// Model backend settings
    pub llm: LlmConfig,

    /// Directory scanning settings
    pub scan: ScanConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(DocError::config("llm.timeout_secs must be greater than 0"));
        }

        if self.llm.concurrency == 0 {
            return Err(DocError::config("llm.concurrency must be greater than 0"));
        }

        if let Some(api_base) = &self.llm.api_base {
            let url = url::Url::parse(api_base).map_err(|e| {
                DocError::config(format!("llm.api_base '{}' is not a valid URL: {}", api_base, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(DocError::config(format!(
                    "llm.api_base must use http or https, got: {}",
                    url.scheme()
                )));
            }
        }

        if self.scan.max_file_size == 0 {
            return Err(DocError::config("scan.max_file_size must be greater than 0"));
        }

        Ok(())
    }

    /// Immutable generation settings for this run
    pub fn generation_config(&self) -> GenerationConfig {
        let g = &self.generation;
        GenerationConfig::from_format(
            g.docstring_format,
            g.include_raises,
            g.include_returns,
            g.include_examples,
        )
    }

    /// Transport settings for the selected backend
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            timeout_secs: self.llm.timeout_secs,
            api_key: self.llm.api_key.clone(),
            api_base: self.llm.api_base.clone(),
            max_tokens: self.llm.max_tokens,
        }
    }
}

// =============================================================================
// Generation Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// google, numpy, or sphinx
    pub docstring_format: DocstringFormat,
    pub include_raises: bool,
    pub include_returns: bool,
    pub include_examples: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            docstring_format: DocstringFormat::default(),
            include_raises: true,
            include_returns: true,
            include_examples: true,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier, e.g. "openai:gpt-4o"
    pub model: ModelId,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Files processed concurrently
    pub concurrency: usize,

    /// Custom API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Maximum completion tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// API key; prefer the provider's environment variable
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("concurrency", &self.concurrency)
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: ModelId::default(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            concurrency: batch::DEFAULT_CONCURRENCY,
            api_base: None,
            max_tokens: None,
            api_key: None,
        }
    }
}

// =============================================================================
// Scan Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Glob patterns relative to the input directory
    pub exclude: Vec<String>,

    /// Files larger than this (bytes) are ignored
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            max_file_size: scan::MAX_FILE_SIZE,
        }
    }
}
