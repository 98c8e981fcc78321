//! Centralized error types for Jeera.
//!
//! Aggregates configuration, API and IO failures and renders them as short
//! messages for the terminal.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (runtime creation, terminal prompts).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get a user-friendly message for display.
    ///
    /// Server-provided text is kept where it explains the failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::Missing(names) => {
                    format!("Missing configuration: {}.", names.join(", "))
                }
                ConfigError::ReadError { path, .. } => {
                    format!("Could not read {}. Check that it is readable.", path.display())
                }
            },
            AppError::Api(e) => match e {
                ApiError::Network(_) => {
                    "Connection failed. Please check JIRA_BASE_URL and your network.".to_string()
                }
                ApiError::Encode(_) => "Could not encode the request.".to_string(),
                ApiError::Decode(_) => {
                    "Unexpected response from JIRA. Run with --debug for details.".to_string()
                }
                err if err.is_auth_failure() => {
                    "Authentication failed. Please check JIRA_USERNAME and your token.".to_string()
                }
                ApiError::Remote { status, body } if body.is_empty() => {
                    format!("JIRA returned HTTP {}.", status)
                }
                ApiError::Remote { status, .. } => {
                    format!("JIRA returned HTTP {}: {}", status, e.message())
                }
                ApiError::NotFound(what) => format!("{} was not found.", what),
                ApiError::BadRequest(_) => format!("JIRA rejected the request: {}", e.message()),
                ApiError::MalformedResponse(msg) => format!("Unexpected response from JIRA: {}", msg),
                ApiError::UnmappedField { .. } | ApiError::InvalidField { .. } => e.to_string(),
            },
            AppError::Io(e) => format!("IO error: {}", e),
        }
    }

    /// Whether the process should stop.
    ///
    /// Only configuration problems are fatal; everything else is reported and
    /// the shell carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
