//! In-memory backend for generator and batch tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::CancellationFlag;
use crate::ai::provider::{ModelBackend, ModelResponse, TokenUsage};
use crate::types::{BackendError, ErrorCategory, Result};

pub(crate) enum MockReply {
    /// Wrap the user content in the output fence unchanged
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Fail every call
    Fail(ErrorCategory),
    /// Fail when the user content contains the marker, echo otherwise
    FailWhen(String),
}

pub(crate) struct MockBackend {
    reply: MockReply,
    calls: AtomicUsize,
    last_system_prompt: Mutex<Option<String>>,
    cancel_on_call: Option<CancellationFlag>,
}

impl MockBackend {
    pub(crate) fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_system_prompt: Mutex::new(None),
            cancel_on_call: None,
        }
    }

    /// Trip the flag as soon as the first call arrives
    pub(crate) fn cancelling(mut self, flag: CancellationFlag) -> Self {
        self.cancel_on_call = Some(flag);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_system_prompt(&self) -> Option<String> {
        self.last_system_prompt.lock().unwrap().clone()
    }

    fn echo(user_content: &str) -> String {
        format!("```generated-python-code\n{}\n```", user_content)
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<ModelResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system_prompt.lock().unwrap() = Some(system_prompt.to_string());

        if let Some(flag) = &self.cancel_on_call {
            flag.cancel();
        }

        let content = match &self.reply {
            MockReply::Echo => Self::echo(user_content),
            MockReply::Fixed(text) => text.clone(),
            MockReply::Fail(category) => {
                return Err(BackendError::with_provider(*category, "mock failure", "mock").into());
            }
            MockReply::FailWhen(marker) if user_content.contains(marker.as_str()) => {
                return Err(
                    BackendError::with_provider(ErrorCategory::Transient, "mock failure", "mock")
                        .into(),
                );
            }
            MockReply::FailWhen(_) => Self::echo(user_content),
        };

        let mut response = ModelResponse::content_only(content);
        response.usage = TokenUsage::from_openai(10, 5);
        Ok(response)
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!matches!(self.reply, MockReply::Fail(_)))
    }
}
