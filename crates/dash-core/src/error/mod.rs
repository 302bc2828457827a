//! Error types and result aliases for dashboard operations.
//!
//! Provides a unified error type that covers the failure conditions of the
//! registry, workspace and configuration crates with actionable messages.

use thiserror::Error;

/// Unified error type for all dashboard operations
#[derive(Error, Debug)]
pub enum DashError {
    // Backend / registry errors
    /// The server answered with a non-success status. `message` is the text
    /// the server reported, so it is what callers compare against.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to parse JSON: {message}")]
    JsonParse { message: String },

    // Config errors
    #[error("Failed to parse dashboard.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Workspace errors
    #[error("{message}")]
    Workspace { message: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for dashboard operations
pub type DashResult<T> = Result<T, DashError>;

impl DashError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// HTTP status attached to this error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            DashError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            DashError::Network { .. } => Some("Check your network connection and the registry URL"),
            DashError::Http { status: 401, .. } => {
                Some("Refresh the bearer token (DASH_TOKEN or [backend].token) and try again")
            }
            DashError::InvalidUrl { .. } => Some("Registry URLs must be absolute http(s) URLs"),
            DashError::TomlParse { .. } | DashError::ConfigValidation { .. } => {
                Some("Fix dashboard.toml and run the command again")
            }
            DashError::Http { status: 403, .. } => {
                Some("Check the RBAC permissions of the current user")
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DashError {
    fn from(error: serde_json::Error) -> Self {
        DashError::JsonParse {
            message: error.to_string(),
        }
    }
}
