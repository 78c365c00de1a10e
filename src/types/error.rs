//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Every failure kind is a distinct variant so that batch drivers can decide
//! whether to skip a file and continue or abort the whole run.
//!
//! ## Error Kinds
//!
//! - **Config**: invalid configuration, raised at construction time only
//! - **Backend**: the model call failed (network, auth, quota, provider error)
//! - **FormatViolation**: the model ignored the required output fence
//! - **InvalidOutput**: the fenced code does not parse as Python
//! - **Parse**: syntax tree setup failed

use std::fmt;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Backend failure categories, derived from HTTP status or transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues, including timeouts
    Network,
    /// Model or endpoint not found
    Unavailable,
    /// Request rejected as malformed
    BadRequest,
    /// Temporary server-side issue
    Transient,
    /// Unclassified failure
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Classify an HTTP status code returned by a provider
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            401 | 403 => Self::Auth,
            400 | 422 => Self::BadRequest,
            404 => Self::Unavailable,
            500..=599 => Self::Transient,
            _ => Self::Unknown,
        }
    }
}

// =============================================================================
// Backend Error
// =============================================================================

/// Failure of a model backend call
#[derive(Debug, Clone)]
pub struct BackendError {
    /// Error category for inspection by callers
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for BackendError {}

impl BackendError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Classify a provider HTTP error response
    pub fn from_http_status(status: u16, body: &str, provider: &str) -> Self {
        Self::with_provider(
            ErrorCategory::from_http_status(status),
            format!("HTTP {}: {}", status, body),
            provider,
        )
    }

    /// Classify a transport-level request failure
    pub fn from_request(err: &reqwest::Error, provider: &str) -> Self {
        let category = if err.is_timeout() || err.is_connect() {
            ErrorCategory::Network
        } else if let Some(status) = err.status() {
            ErrorCategory::from_http_status(status.as_u16())
        } else if err.is_decode() || err.is_body() {
            ErrorCategory::Transient
        } else {
            ErrorCategory::Unknown
        };
        Self::with_provider(category, err.to_string(), provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(BackendError),

    #[error(
        "Model response violated the output format: expected exactly one \
         ```generated-python-code block, found {blocks_found}"
    )]
    FormatViolation { blocks_found: usize },

    #[error("Model output is not valid Python: {reason}")]
    InvalidOutput { reason: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<BackendError> for DocError {
    fn from(err: BackendError) -> Self {
        DocError::Backend(err)
    }
}

pub type Result<T> = std::result::Result<T, DocError>;

impl DocError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_format_violation(&self) -> bool {
        matches!(self, Self::FormatViolation { .. })
    }

    pub fn is_invalid_output(&self) -> bool {
        matches!(self, Self::InvalidOutput { .. })
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Backend category, if this is a backend failure
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Backend(e) => Some(e.category),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
