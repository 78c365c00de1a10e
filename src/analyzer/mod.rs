//! Source Analysis Module
//!
//! - Skippability classification of Python source units
//! - File discovery for batch runs

pub mod scanner;
pub mod skip;

pub use scanner::{PythonFileScanner, ScannedFile};
pub use skip::{SkipReason, classify, create_python_parser, is_skippable};
