//! Custom error types for the quality gate.
//!
//! Individual checks never fail with an error: they fold every problem into a
//! failing result. The errors here cover what can escape to the top level of
//! a run: configuration problems, a missing CI context and reporting failures.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for quality gate operations
#[derive(Error, Debug)]
pub enum GateError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // =========================================================================
    // CI Context Errors
    // =========================================================================
    /// A required CI environment variable is missing or malformed
    #[error("GitHub context unavailable: {detail}")]
    MissingContext { detail: String },

    // =========================================================================
    // Reporting Errors
    // =========================================================================
    /// The source-hosting API rejected a request
    #[error("GitHub API {operation} failed with HTTP {status}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// HTTP transport error wrapper
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl GateError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create an invalid-field error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-context error
    pub fn missing_context(detail: impl Into<String>) -> Self {
        Self::MissingContext {
            detail: detail.into(),
        }
    }

    /// Create an API error
    pub fn api(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error stems from user-supplied configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::InvalidConfig { .. })
    }
}

/// Type alias for quality gate results
pub type Result<T> = std::result::Result<T, GateError>;
