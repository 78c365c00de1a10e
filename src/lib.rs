//! docugenius - LLM-Driven Docstring Generation for Python
//!
//! Inserts docstrings into Python source by delegating to a chat-completion
//! model, while leaving trivial files alone and refusing malformed answers.
//!
//! ## Core Features
//!
//! - **Skip Analysis**: imports-only, docstring-only, and constants-only
//!   files never reach the model (tree-sitter Python grammar)
//! - **Deterministic Prompts**: the instruction is a pure function of the
//!   generation settings
//! - **Strict Output Contract**: exactly one fenced code block or a
//!   `FormatViolation`; code that does not parse is `InvalidOutput`
//! - **Batch Runs**: bounded concurrency with cooperative cancellation
//!
//! ## Quick Start
//!
//! ```ignore
//! use docugenius::{DocstringGenerator, GenerationConfig, ModelId};
//! use docugenius::ai::{BackendConfig, create_backend};
//!
//! let backend = create_backend(ModelId::Gpt4o, &BackendConfig::default())?;
//! let config = GenerationConfig::new("numpy", true, true, false)?;
//! let generator = DocstringGenerator::new(config, backend);
//! let documented = generator.generate(&source).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt rendering, model backends, output validation
//! - [`analyzer`]: skippability analysis and file discovery
//! - [`generator`]: generation façade and batch runner
//! - [`config`]: layered configuration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod generator;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::{BackendError, DocError, ErrorCategory, Result};

// Generation
pub use generator::{
    BatchRunner, BatchSummary, CancellationFlag, DocstringGenerator, FileReport, FileStatus,
    GenerationOutcome, OutputTarget,
};
pub use types::{DocstringFormat, GenerationConfig, ModelId};

// AI
pub use ai::{ModelBackend, ModelResponse, OpenAiBackend, SharedBackend, create_backend};

// Analyzer
pub use analyzer::{PythonFileScanner, SkipReason, classify, is_skippable};
