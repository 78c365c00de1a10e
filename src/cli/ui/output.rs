use console::style;
use std::path::Path;

use crate::generator::FileStatus;

/// Styled status lines for command output.
///
/// Errors always reach stderr; everything else is dropped in quiet mode.
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn section(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold());
            println!("{}", "─".repeat(40));
        }
    }

    /// One line per processed file
    pub fn file_status(&self, path: &Path, status: &FileStatus) {
        let path = path.display();
        match status {
            FileStatus::Documented => self.success(&path.to_string()),
            FileStatus::Skipped(reason) => {
                self.info(&format!("{} {}", path, style(format!("({})", reason)).dim()))
            }
            FileStatus::Failed(message) => self.error(&format!("{}: {}", path, message)),
            FileStatus::Cancelled => self.warning(&format!("{} (cancelled)", path)),
        }
    }

    pub fn line(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
