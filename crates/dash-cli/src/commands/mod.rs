//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking the shared [`CommandContext`].

use camino::{Utf8Path, Utf8PathBuf};
use dash_config::{ConfigLoader, ConfigSource, DashboardToml};
use dash_core::error::{DashError, DashResult};
use tracing::info;

pub mod devfiles;
pub mod registries;


use crate::{Commands, output::OutputHandler};

/// Shared context for all commands
pub struct CommandContext {
    pub config: DashboardToml,
    pub source: ConfigSource,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Load configuration and apply environment overrides
    pub async fn new(config_path: Option<&Utf8Path>) -> DashResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| DashError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| DashError::ConfigValidation {
                field: "cwd".to_string(),
                reason: format!("Working directory is not valid UTF-8: {}", e),
            })?;

        let (config, source) = ConfigLoader::new(cwd).load(config_path).await?;
        let config = dash_config::apply_env_overrides(config, unicode_env_vars())?;
        info!("Loaded configuration from {:?}", source);

        Ok(Self {
            config,
            source,
            output: OutputHandler::new(),
        })
    }
}

/// Process environment, skipping variables whose name or value is not
/// valid Unicode
fn unicode_env_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os().filter_map(|(name, value)| {
        Some((name.into_string().ok()?, value.into_string().ok()?))
    })
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> DashResult<()> {
    match command {
        Commands::Registries => {
            info!("Listing registries");
            registries::execute(ctx).await
        }
        Commands::Devfiles { url, external, raw } => {
            info!("Fetching devfiles (url: {:?}, external: {}, raw: {})", url, external, raw);
            devfiles::execute(url, external, raw, ctx).await
        }
    }
}
