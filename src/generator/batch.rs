//! Batch Generation
//!
//! Runs the generator over many files with bounded concurrency.
//!
//! Each file is handled independently: read, generate, write. A failure is
//! logged with its path and recorded in the summary; the remaining files
//! still run. Cancellation is cooperative: files that have not started when
//! the flag trips are reported as cancelled, while in-flight requests finish
//! and are written.

use futures::stream::StreamExt;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{DocstringGenerator, GenerationOutcome};
use crate::ai::provider::TokenUsage;
use crate::analyzer::SkipReason;
use crate::constants::batch::DEFAULT_CONCURRENCY;
use crate::types::{DocError, Result};

// =============================================================================
// Output Target
// =============================================================================

/// Where generated files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Overwrite each input file
    InPlace,
    /// Write to `output_root/<path relative to input_root>`
    ///
    /// When `input_root` is itself a file, `output_root` is the file to write.
    Mirror {
        input_root: PathBuf,
        output_root: PathBuf,
    },
}

impl OutputTarget {
    pub fn mirror(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self::Mirror {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Output path for one input file
    pub fn resolve(&self, input: &Path) -> Result<PathBuf> {
        match self {
            Self::InPlace => Ok(input.to_path_buf()),
            Self::Mirror {
                input_root,
                output_root,
            } => {
                let relative = input.strip_prefix(input_root).map_err(|_| {
                    DocError::config(format!(
                        "{} is not under input root {}",
                        input.display(),
                        input_root.display()
                    ))
                })?;

                if relative.as_os_str().is_empty() {
                    Ok(output_root.clone())
                } else {
                    Ok(output_root.join(relative))
                }
            }
        }
    }

    pub fn is_in_place(&self) -> bool {
        matches!(self, Self::InPlace)
    }
}

// =============================================================================
// Cancellation
// =============================================================================

/// Shared cooperative cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Final state of one file in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Nothing to document; the reason is kept for reporting
    Skipped(SkipReason),
    /// Docstrings generated and written
    Documented,
    /// Read, generation, or write failed
    Failed(String),
    /// Not started before cancellation
    Cancelled,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped ({})", reason),
            Self::Documented => write!(f, "documented"),
            Self::Failed(message) => write!(f, "failed: {}", message),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Per-file batch result
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    /// Written path, if anything was written
    pub output: Option<PathBuf>,
    pub status: FileStatus,
    pub usage: TokenUsage,
}

impl FileReport {
    fn new(input: PathBuf, status: FileStatus) -> Self {
        Self {
            input,
            output: None,
            status,
            usage: TokenUsage::default(),
        }
    }
}

/// Aggregated batch result, reports sorted by input path
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
    pub usage: TokenUsage,
    pub elapsed: Duration,
}

impl BatchSummary {
    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn documented(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Documented))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed(_)))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Cancelled))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, FileStatus::Failed(_)))
    }
}

// =============================================================================
// Batch Runner
// =============================================================================

pub struct BatchRunner {
    generator: Arc<DocstringGenerator>,
    target: OutputTarget,
    concurrency: usize,
    cancel: CancellationFlag,
}

impl BatchRunner {
    pub fn new(generator: Arc<DocstringGenerator>, target: OutputTarget) -> Self {
        Self {
            generator,
            target,
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancellationFlag::new(),
        }
    }

    /// Maximum files in flight; clamped to at least one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Process every file and collect per-file reports
    pub async fn run(&self, files: Vec<PathBuf>) -> BatchSummary {
        let start = Instant::now();
        info!(
            "Generating docstrings for {} file(s) with {} worker(s)",
            files.len(),
            self.concurrency
        );

        let mut stream = futures::stream::iter(files)
            .map(|path| {
                let generator = Arc::clone(&self.generator);
                let target = self.target.clone();
                let cancel = self.cancel.clone();
                async move { process_file(&generator, &target, &cancel, path).await }
            })
            .buffer_unordered(self.concurrency);

        let mut summary = BatchSummary::default();
        while let Some(report) = stream.next().await {
            summary.usage.add(report.usage);
            summary.reports.push(report);
        }

        summary.reports.sort_by(|a, b| a.input.cmp(&b.input));
        summary.elapsed = start.elapsed();

        info!(
            "Batch finished in {:.1}s: {} documented, {} skipped, {} failed, {} cancelled",
            summary.elapsed.as_secs_f64(),
            summary.documented(),
            summary.skipped(),
            summary.failed(),
            summary.cancelled()
        );

        summary
    }
}

async fn process_file(
    generator: &DocstringGenerator,
    target: &OutputTarget,
    cancel: &CancellationFlag,
    input: PathBuf,
) -> FileReport {
    if cancel.is_cancelled() {
        debug!("Cancelled before start: {}", input.display());
        return FileReport::new(input, FileStatus::Cancelled);
    }

    match generate_file(generator, target, &input).await {
        Ok(report) => report,
        Err(e) => {
            warn!("Failed to document {}: {}", input.display(), e);
            FileReport::new(input, FileStatus::Failed(e.to_string()))
        }
    }
}

async fn generate_file(
    generator: &DocstringGenerator,
    target: &OutputTarget,
    input: &Path,
) -> Result<FileReport> {
    let output = target.resolve(input)?;
    let source = tokio::fs::read_to_string(input).await?;

    let mut report = FileReport::new(input.to_path_buf(), FileStatus::Documented);

    match generator.generate_with_outcome(&source).await? {
        GenerationOutcome::Unchanged(reason) => {
            report.status = FileStatus::Skipped(reason);
            // In place there is nothing to write; a mirror still gets a copy.
            if output != input {
                write_output(&output, &source).await?;
                report.output = Some(output);
            }
            debug!("Skipped {}: {}", input.display(), reason);
        }
        GenerationOutcome::Generated { code, usage } => {
            write_output(&output, &code).await?;
            info!("Documented {}", output.display());
            report.output = Some(output);
            report.usage = usage;
        }
    }

    Ok(report)
}

async fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}
