//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Model output contract
pub mod output {
    /// Label that must follow the opening triple backtick of the answer block
    pub const FENCE_LABEL: &str = "generated-python-code";
}

/// Sampling parameters sent with every completion request
pub mod sampling {
    /// Zero temperature for the most deterministic output
    pub const TEMPERATURE: f32 = 0.0;

    /// Full nucleus mass
    pub const TOP_P: f32 = 1.0;
}

/// Batch processing constants
pub mod batch {
    /// Default number of files documented concurrently
    pub const DEFAULT_CONCURRENCY: usize = 4;
}

/// File discovery constants
pub mod scan {
    /// Maximum file size to document (1MB)
    pub const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Extension of candidate source files
    pub const SOURCE_EXTENSION: &str = "py";

    /// Directories never descended into
    pub const SKIP_DIRS: &[&str] = &[
        ".git",
        "__pycache__",
        ".venv",
        "venv",
        "node_modules",
        "build",
        "dist",
    ];
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}
