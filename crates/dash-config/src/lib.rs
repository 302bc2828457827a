//! Configuration parsing for the dashboard tools
//!
//! This crate handles parsing and validation of `dashboard.toml`: which
//! devfile registries to read and how to reach the dashboard backend.

pub mod toml;
pub mod merge;

// Re-export main types
pub use crate::toml::{BackendSection, DashboardToml};
pub use crate::merge::{apply_env_overrides, ConfigLoader, ConfigSource, CONFIG_FILE_NAME};

use dash_core::error::DashError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, DashError>;
