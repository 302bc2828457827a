//! `dash registries` command implementation.

use dash_config::ConfigSource;
use dash_core::error::DashResult;
use super::CommandContext;

/// Execute the `dash registries` command
pub async fn execute(ctx: &CommandContext) -> DashResult<()> {
    match &ctx.source {
        ConfigSource::Default => ctx.output.info("No dashboard.toml found, using defaults"),
        ConfigSource::Explicit(path) | ConfigSource::Project(path) | ConfigSource::Global(path) => {
            ctx.output.info(&format!("Configuration: {}", path))
        }
    }

    if ctx.config.registries.is_empty() {
        ctx.output.warn("No registries configured");
        return Ok(());
    }

    for registry in &ctx.config.registries {
        let kind = if registry.external { "external" } else { "internal" };
        ctx.output.line(&format!("{}\t{}", kind, registry.url));
    }
    Ok(())
}
