//! dashboard.toml configuration parsing and serialization

use serde::{Deserialize, Serialize};
use url::Url;

use dash_core::error::DashError;
use dash_core::types::RegistrySource;
use crate::ConfigResult;

/// Complete dashboard.toml configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardToml {
    /// Backend client settings
    #[serde(default)]
    pub backend: BackendSection,

    /// Devfile registries, in display order
    #[serde(default)]
    pub registries: Vec<RegistrySource>,
}

/// How requests to the backend and registries are made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackendSection {
    /// Error message that marks a failure as "token is being refreshed"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recoverable_error_message: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            recoverable_error_message: None,
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

/// Parse TOML string to DashboardToml configuration
pub fn parse_dashboard_toml(content: &str) -> ConfigResult<DashboardToml> {
    // First try with toml_edit for better error reporting
    content.parse::<toml_edit::DocumentMut>()
        .map_err(|e| DashError::TomlParse { message: format!("TOML syntax error: {}", e) })?;

    // Then parse with serde for type safety
    let config: DashboardToml = toml::from_str(content)
        .map_err(|e| DashError::TomlParse { message: format!("TOML parsing error: {}", e) })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize DashboardToml to TOML string
pub fn serialize_dashboard_toml(config: &DashboardToml) -> ConfigResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| DashError::TomlParse { message: format!("TOML serialization error: {}", e) })
}

/// Validate configuration completeness
pub fn validate_config(config: &DashboardToml) -> ConfigResult<()> {
    if config.backend.timeout_secs == 0 {
        return Err(DashError::ConfigValidation {
            field: "backend.timeout-secs".to_string(),
            reason: "Timeout must be at least one second".to_string(),
        });
    }

    if let Some(message) = &config.backend.recoverable_error_message {
        if message.trim().is_empty() {
            return Err(DashError::ConfigValidation {
                field: "backend.recoverable-error-message".to_string(),
                reason: "Recoverable error message must not be blank".to_string(),
            });
        }
    }

    for (index, registry) in config.registries.iter().enumerate() {
        validate_registry_url(index, &registry.url)?;
    }

    Ok(())
}

fn validate_registry_url(index: usize, url: &str) -> ConfigResult<()> {
    let field = format!("registries[{}].url", index);
    let parsed = Url::parse(url).map_err(|e| DashError::ConfigValidation {
        field: field.clone(),
        reason: format!("Invalid URL '{}': {}", url, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(DashError::ConfigValidation {
            field,
            reason: format!("Unsupported scheme '{}', expected http or https", scheme),
        }),
    }
}

/// Load and parse dashboard.toml from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<DashboardToml> {
    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| DashError::io(format!("Failed to read {}", path), e))?;

    parse_dashboard_toml(&content)
        .map_err(|e| match e {
            DashError::TomlParse { message } => DashError::TomlParse {
                message: format!("In file {}: {}", path, message),
            },
            DashError::ConfigValidation { field, reason } => DashError::ConfigValidation {
                field,
                reason: format!("In file {}: {}", path, reason),
            },
            other => other,
        })
}
