//! OpenAI API Backend
//!
//! Model backend using OpenAI's Chat Completions API.
//! Requests are sent with temperature 0 and top_p 1.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{BackendConfig, ModelBackend, ModelResponse, ResponseTiming, TokenUsage};
use crate::constants::network::CONNECTION_TIMEOUT_SECS;
use crate::constants::sampling::{TEMPERATURE, TOP_P};
use crate::types::{BackendError, DocError, ErrorCategory, Result};

const PROVIDER: &str = "openai";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI API backend with secure API key handling
pub struct OpenAiBackend {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    max_tokens: Option<usize>,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiBackend {
    pub fn new(model: impl Into<String>, config: BackendConfig) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key, std::env::var(API_KEY_ENV).ok())?;

        let api_base = match config.api_base {
            Some(base) => normalize_api_base(&base)?,
            None => DEFAULT_API_BASE.to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                DocError::config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base,
            model: model.into(),
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, system_prompt: &str, user_content: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: self.max_tokens,
        }
    }
}

/// Explicit config wins over the environment
fn resolve_api_key(configured: Option<String>, from_env: Option<String>) -> Result<String> {
    configured
        .or(from_env)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            DocError::config(format!(
                "OpenAI API key not found. Set {} or provide llm.api_key in config",
                API_KEY_ENV
            ))
        })
}

/// Validate a custom API base and strip the trailing slash
pub(crate) fn normalize_api_base(api_base: &str) -> Result<String> {
    let url = url::Url::parse(api_base).map_err(|e| {
        DocError::config(format!("Invalid API base URL '{}': {}", api_base, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DocError::config(format!(
            "API base must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<ModelResponse> {
        info!("Generating with OpenAI (model: {})", self.model);

        let start_time = Instant::now();
        let request = self.build_request(system_prompt, user_content);
        let url = format!("{}/chat/completions", self.api_base);

        debug!(
            "Sending request to OpenAI API ({} bytes of source)",
            user_content.len()
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::from_request(&e, PROVIDER))?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::from_http_status(status.as_u16(), &body, PROVIDER).into());
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            BackendError::with_provider(
                ErrorCategory::Transient,
                format!("Failed to parse OpenAI response: {}", e),
                PROVIDER,
            )
        })?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                BackendError::with_provider(
                    ErrorCategory::Unknown,
                    "No content in OpenAI response",
                    PROVIDER,
                )
            })?;

        debug!(
            "Received {} bytes from OpenAI in {}ms ({} tokens)",
            content.len(),
            elapsed.as_millis(),
            usage.total()
        );

        Ok(ModelResponse {
            content,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
        })
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.api_base);

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("OpenAI API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("OpenAI API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("OpenAI API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}
