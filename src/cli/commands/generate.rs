//! Generate Command
//!
//! Document a Python file or every Python file under a directory.
//!
//! Usage:
//!   docugenius generate <INPUT_PATH> [-m MODEL] [-d FORMAT] [-r] [-R] [-e]
//!                       [-o OUTPUT_PATH] [-j JOBS]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::ai::provider::{SharedBackend, create_backend};
use crate::analyzer::PythonFileScanner;
use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader, ScanConfig};
use crate::generator::{
    BatchRunner, BatchSummary, CancellationFlag, DocstringGenerator, OutputTarget,
};
use crate::types::{BackendError, DocError, DocstringFormat, ErrorCategory, ModelId, Result};

/// Options collected from the command line
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub model: Option<String>,
    pub docstring_format: Option<String>,
    pub skip_raises: bool,
    pub skip_returns: bool,
    pub skip_examples: bool,
    pub jobs: Option<usize>,
    pub config_path: Option<PathBuf>,
    pub quiet: bool,
}

/// Run the generate command and return the batch summary
pub async fn run(options: GenerateOptions, cancel: CancellationFlag) -> Result<BatchSummary> {
    let mut config = ConfigLoader::load(options.config_path.as_deref())?;
    apply_overrides(&mut config, &options)?;

    let (files, target) =
        collect_inputs(&options.input, options.output.as_deref(), &config.scan)?;

    let output = Output::quiet(options.quiet);
    if files.is_empty() {
        output.warning(&format!(
            "No Python files found under {}",
            options.input.display()
        ));
        return Ok(BatchSummary::default());
    }

    let backend = create_backend(config.llm.model, &config.backend_config())?;
    info!(
        "Using {} ({} docstrings)",
        config.llm.model, config.generation.docstring_format
    );
    ensure_backend_ready(&backend).await?;

    let generator = Arc::new(DocstringGenerator::new(config.generation_config(), backend));
    let runner = BatchRunner::new(generator, target)
        .with_concurrency(config.llm.concurrency)
        .with_cancellation(cancel);

    let summary = runner.run(files).await;
    print_summary(&output, &summary);

    Ok(summary)
}

/// Fail fast when the backend is unreachable or rejects the credentials
async fn ensure_backend_ready(backend: &SharedBackend) -> Result<()> {
    if backend.health_check().await? {
        return Ok(());
    }

    Err(DocError::Backend(BackendError::with_provider(
        ErrorCategory::Unavailable,
        format!("health check failed for model {}", backend.model()),
        backend.name(),
    )))
}

/// Apply command-line flags on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &GenerateOptions) -> Result<()> {
    if let Some(model) = &options.model {
        config.llm.model = model.parse::<ModelId>()?;
    }

    if let Some(format) = &options.docstring_format {
        config.generation.docstring_format = format.parse::<DocstringFormat>()?;
    }

    if options.skip_raises {
        config.generation.include_raises = false;
    }
    if options.skip_returns {
        config.generation.include_returns = false;
    }
    if options.skip_examples {
        config.generation.include_examples = false;
    }

    if let Some(jobs) = options.jobs {
        config.llm.concurrency = jobs;
    }

    config.validate()
}

/// Resolve the files to process and where their output goes
fn collect_inputs(
    input: &Path,
    output: Option<&Path>,
    scan: &ScanConfig,
) -> Result<(Vec<PathBuf>, OutputTarget)> {
    let target = match output {
        Some(out) => OutputTarget::mirror(input, out),
        None => OutputTarget::InPlace,
    };

    if input.is_file() {
        return Ok((vec![input.to_path_buf()], target));
    }

    if !input.is_dir() {
        return Err(DocError::config(format!(
            "Input path does not exist: {}",
            input.display()
        )));
    }

    let files = PythonFileScanner::new(input)
        .with_exclude(&scan.exclude)?
        .with_max_file_size(scan.max_file_size)
        .scan()?
        .into_iter()
        .map(|f| f.path)
        .collect();

    Ok((files, target))
}

fn print_summary(output: &Output, summary: &BatchSummary) {
    output.section("Summary");

    for report in &summary.reports {
        output.file_status(&report.input, &report.status);
    }

    output.line("");
    output.line(&format!(
        "  {} documented, {} skipped, {} failed, {} cancelled in {:.1}s",
        summary.documented(),
        summary.skipped(),
        summary.failed(),
        summary.cancelled(),
        summary.elapsed.as_secs_f64()
    ));
    if summary.usage.total() > 0 {
        output.line(&format!(
            "  Tokens: {} in / {} out",
            summary.usage.input_tokens, summary.usage.output_tokens
        ));
    }
}
