//! Docstring Generation
//!
//! [`DocstringGenerator`] sequences one generation request:
//!
//! ```text
//! START -> (empty or skippable?) -> DONE-UNCHANGED
//!       -> PROMPT-BUILT -> MODEL-CALLED -> PARSED -> VALIDATED -> DONE-REPLACED
//! ```
//!
//! Backend, format and syntax failures propagate unchanged. Nothing is retried.
//! The generator holds no mutable state and is shared across batch workers
//! behind an `Arc`.

pub mod batch;

#[cfg(test)]
pub(crate) mod mock;

pub use batch::{
    BatchRunner, BatchSummary, CancellationFlag, FileReport, FileStatus, OutputTarget,
};

use tracing::{debug, info};

use crate::ai::provider::{SharedBackend, TokenUsage};
use crate::ai::{extract_generated_code, prompt, validate_python};
use crate::analyzer::{SkipReason, classify};
use crate::types::{GenerationConfig, Result};

/// Result of a single generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Source needs no documentation; no backend call was made
    Unchanged(SkipReason),
    /// Source was documented by the model
    Generated { code: String, usage: TokenUsage },
}

impl GenerationOutcome {
    /// Resolve to the text that should replace `original`
    pub fn into_source(self, original: &str) -> String {
        match self {
            Self::Unchanged(_) => original.to_string(),
            Self::Generated { code, .. } => code,
        }
    }
}

/// Generation façade over a prompt, a backend, and the output parser
pub struct DocstringGenerator {
    config: GenerationConfig,
    backend: SharedBackend,
}

impl DocstringGenerator {
    pub fn new(config: GenerationConfig, backend: SharedBackend) -> Self {
        Self { config, backend }
    }

    /// Document `source`, returning it unchanged when there is nothing to do.
    pub async fn generate(&self, source: &str) -> Result<String> {
        Ok(self.generate_with_outcome(source).await?.into_source(source))
    }

    /// Like [`generate`](Self::generate), but reports why a source was left
    /// alone and how many tokens the model call used.
    pub async fn generate_with_outcome(&self, source: &str) -> Result<GenerationOutcome> {
        if source.trim().is_empty() {
            debug!("Empty source, skipping");
            return Ok(GenerationOutcome::Unchanged(SkipReason::Empty));
        }

        if let Some(reason) = classify(source) {
            debug!("Source needs no docstrings: {}", reason);
            return Ok(GenerationOutcome::Unchanged(reason));
        }

        let system_prompt = prompt::render(&self.config);

        info!(
            "Requesting {} docstrings from {}:{} ({} bytes)",
            self.config.docstring_format(),
            self.backend.name(),
            self.backend.model(),
            source.len()
        );

        let response = self.backend.complete(&system_prompt, source).await?;
        let mut code = extract_generated_code(&response.content)?;
        validate_python(&code)?;

        // The parser trims; keep the input's final line ending.
        if source.ends_with("\r\n") {
            code.push_str("\r\n");
        } else if source.ends_with('\n') {
            code.push('\n');
        }

        debug!(
            "Generated {} bytes in {}ms ({} tokens)",
            code.len(),
            response.timing.total_ms,
            response.usage.total()
        );

        Ok(GenerationOutcome::Generated {
            code,
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::mock::{MockBackend, MockReply};
    use crate::types::{DocError, DocstringFormat, ErrorCategory};
    use std::sync::Arc;

    fn generator(backend: Arc<MockBackend>) -> DocstringGenerator {
        DocstringGenerator::new(GenerationConfig::default(), backend)
    }

    #[tokio::test]
    async fn test_imports_only_unchanged_without_backend_call() {
        let backend = Arc::new(MockBackend::new(MockReply::Echo));
        let generator = generator(backend.clone());

        let output = generator.generate("import os\n").await.unwrap();

        assert_eq!(output, "import os\n");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_unchanged_without_backend_call() {
        let backend = Arc::new(MockBackend::new(MockReply::Echo));
        let generator = generator(backend.clone());

        assert_eq!(generator.generate("").await.unwrap(), "");
        assert_eq!(generator.generate("  \n\t\n").await.unwrap(), "  \n\t\n");
        assert_eq!(
            generator.generate_with_outcome("").await.unwrap(),
            GenerationOutcome::Unchanged(SkipReason::Empty)
        );
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_skip_reason_reported() {
        let backend = Arc::new(MockBackend::new(MockReply::Echo));
        let generator = generator(backend.clone());

        let outcome = generator
            .generate_with_outcome("MAX_SIZE = 10\nNAME = 'x'\n")
            .await
            .unwrap();
        assert_eq!(outcome, GenerationOutcome::Unchanged(SkipReason::ConstantsOnly));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_echo_round_trips_verbatim() {
        let backend = Arc::new(MockBackend::new(MockReply::Echo));
        let generator = generator(backend.clone());
        let source = "def f(x):\n    return x + 1\n";

        let output = generator.generate(source).await.unwrap();

        assert_eq!(output, source);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_trailing_newline_added_when_input_lacks_one() {
        let backend = Arc::new(MockBackend::new(MockReply::Echo));
        let generator = generator(backend);
        let source = "def f(x):\n    return x + 1";

        assert_eq!(generator.generate(source).await.unwrap(), source);
    }

    #[tokio::test]
    async fn test_generated_code_replaces_source() {
        let documented = "def f(x):\n    \"\"\"Add one.\"\"\"\n    return x + 1";
        let backend = Arc::new(MockBackend::new(MockReply::Fixed(format!(
            "Sure!\n```generated-python-code\n{}\n```\n",
            documented
        ))));
        let generator = generator(backend);

        let outcome = generator
            .generate_with_outcome("def f(x):\n    return x + 1\n")
            .await
            .unwrap();

        match outcome {
            GenerationOutcome::Generated { code, usage } => {
                assert_eq!(code, format!("{}\n", documented));
                assert_eq!(usage.total(), 15);
            }
            other => panic!("expected generated outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prompt_reflects_config() {
        let backend = Arc::new(MockBackend::new(MockReply::Echo));
        let config = GenerationConfig::from_format(DocstringFormat::Sphinx, false, true, false);
        let generator = DocstringGenerator::new(config, backend.clone());

        generator.generate("def f(): pass\n").await.unwrap();

        let system = backend.last_system_prompt().unwrap();
        assert_eq!(system, prompt::render(&config));
        assert!(system.contains("sphinx"));
    }

    #[tokio::test]
    async fn test_unfenced_response_is_format_violation() {
        let backend = Arc::new(MockBackend::new(MockReply::Fixed(
            "def f(x):\n    return x + 1\n".to_string(),
        )));
        let generator = generator(backend);

        let err = generator
            .generate("def f(x):\n    return x + 1\n")
            .await
            .unwrap_err();
        assert!(err.is_format_violation());
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let backend = Arc::new(MockBackend::new(MockReply::Fail(ErrorCategory::RateLimit)));
        let generator = generator(backend.clone());

        let err = generator.generate("def f(): pass\n").await.unwrap_err();

        assert!(matches!(err, DocError::Backend(_)));
        assert_eq!(err.category(), Some(ErrorCategory::RateLimit));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_syntax_error_is_sent_to_backend() {
        let backend = Arc::new(MockBackend::new(MockReply::Echo));
        let generator = generator(backend.clone());

        let err = generator.generate("import os\ndef broken(:\n").await.unwrap_err();
        assert_eq!(backend.calls(), 1);
        // The echoed answer is still broken, so it is refused.
        assert!(err.is_invalid_output());
    }

    #[tokio::test]
    async fn test_nested_fence_in_docstring_is_kept() {
        let documented = "def f(x):\n    \"\"\"Add one.\n\n    Example:\n```python\n    f(1)\n```\n    \"\"\"\n    return x + 1";
        let backend = Arc::new(MockBackend::new(MockReply::Fixed(format!(
            "```generated-python-code\n{}\n```\n",
            documented
        ))));
        let generator = generator(backend);

        let output = generator
            .generate("def f(x):\n    return x + 1\n")
            .await
            .unwrap();

        assert_eq!(output, format!("{}\n", documented));
    }

    #[tokio::test]
    async fn test_truncated_output_is_invalid() {
        let backend = Arc::new(MockBackend::new(MockReply::Fixed(
            "```generated-python-code\ndef f(x):\n    \"\"\"Add one.\n\n    Example:\n```".to_string(),
        )));
        let generator = generator(backend);

        let err = generator
            .generate("def f(x):\n    return x + 1\n")
            .await
            .unwrap_err();

        assert!(err.is_invalid_output());
        assert!(!err.is_format_violation());
    }

    #[tokio::test]
    async fn test_unparseable_output_is_invalid() {
        let backend = Arc::new(MockBackend::new(MockReply::Fixed(
            "```generated-python-code\ndef f(x:\n    return x\n```".to_string(),
        )));
        let generator = generator(backend);

        let err = generator
            .generate("def f(x):\n    return x\n")
            .await
            .unwrap_err();

        assert!(matches!(err, DocError::InvalidOutput { .. }));
    }
}
