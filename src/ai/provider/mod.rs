//! Model Backend Abstraction
//!
//! Defines the `ModelBackend` trait: given a system instruction and user
//! content, return the model's raw text completion. Backends make exactly
//! one request per call; they never retry, batch, or stream.
//!
//! Variants are selected through [`create_backend`], an explicit mapping from
//! [`ModelId`] to a constructor. Adding a provider means adding a module here
//! and an arm to that match; the generator only sees the trait.

mod openai;

pub use openai::OpenAiBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::constants::network::DEFAULT_TIMEOUT_SECS;
use crate::types::{ModelId, Result};

// =============================================================================
// Model Response with Usage Metrics
// =============================================================================

/// Raw model completion with usage metrics
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Completion text, opaque until parsed
    pub content: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
}

impl ModelResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }

    /// Accumulate another response's usage
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Shared backend type for concurrent access across batch workers.
pub type SharedBackend = Arc<dyn ModelBackend>;

// =============================================================================
// Backend Configuration
// =============================================================================

/// Transport settings shared by all backends
///
/// API keys are never serialized and are redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key; falls back to the provider's environment variable
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<usize>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
            api_base: None,
            max_tokens: None,
        }
    }
}

// =============================================================================
// Model Backend Trait
// =============================================================================

/// Text completion capability given system and user messages
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Run one completion. Failures surface as `DocError::Backend`.
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<ModelResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable with the configured credentials
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared backend for a supported model
pub fn create_backend(model: ModelId, config: &BackendConfig) -> Result<SharedBackend> {
    match model {
        ModelId::Gpt4o | ModelId::Gpt4oMini => Ok(Arc::new(OpenAiBackend::new(
            model.model_name(),
            config.clone(),
        )?)),
    }
}
