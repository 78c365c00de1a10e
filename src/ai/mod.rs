//! AI Integration Layer
//!
//! Prompt rendering, model backends, and validation of raw model output.

pub mod prompt;
pub mod provider;
pub mod validation;

pub use prompt::{PromptBuilder, PromptSection, render};
pub use provider::{
    BackendConfig, ModelBackend, ModelResponse, OpenAiBackend, ResponseTiming,
    SharedBackend, TokenUsage, create_backend,
};
pub use validation::{extract_generated_code, validate_python};
