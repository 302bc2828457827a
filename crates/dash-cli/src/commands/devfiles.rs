//! `dash devfiles` command implementation.
//!
//! Fetches the devfile metadata of the configured registries through the
//! retrying backend client and prints it as JSON.

use std::time::Duration;

use dash_config::DashboardToml;
use dash_core::error::{DashError, DashResult};
use dash_core::types::RegistrySource;
use dash_registry::{
    AuthConfig, DevfileMetaData, DevfileRegistry, HttpFetcher, InMemoryStorage, ReqwestClient,
    RetryingClient,
};
use super::CommandContext;

type Registry = DevfileRegistry<HttpFetcher<RetryingClient<ReqwestClient>>, InMemoryStorage>;

/// Execute the `dash devfiles` command
pub async fn execute(url: Option<String>, external: bool, raw: bool, ctx: &CommandContext) -> DashResult<()> {
    let sources = match url {
        Some(url) => vec![RegistrySource { url, external }],
        None => ctx.config.registries.clone(),
    };
    if sources.is_empty() {
        return Err(DashError::ConfigValidation {
            field: "registries".to_string(),
            reason: "No registries configured; add [[registries]] to dashboard.toml or pass --url".to_string(),
        });
    }

    let registry = build_registry(&ctx.config)?;
    let devfiles = collect_devfiles(&registry, &sources, raw).await?;

    ctx.output.json(&serde_json::to_value(&devfiles)?);
    ctx.output.success(&format!("{} devfiles from {} registries", devfiles.len(), sources.len()));
    Ok(())
}

/// Registry client wired from configuration
pub fn build_registry(config: &DashboardToml) -> DashResult<Registry> {
    let auth = config.backend.token.clone().map(|token| AuthConfig {
        token: Some(token),
        ..AuthConfig::default()
    });
    let client = ReqwestClient::with_config(auth, Duration::from_secs(config.backend.timeout_secs))?;

    let client = match &config.backend.recoverable_error_message {
        Some(message) => RetryingClient::with_recoverable_error(client, message.clone()),
        None => RetryingClient::new(client),
    };

    Ok(DevfileRegistry::new(HttpFetcher::new(client), InMemoryStorage::new()))
}

/// Fetch every source in order; resolve unless `raw`
pub async fn collect_devfiles(
    registry: &Registry,
    sources: &[RegistrySource],
    raw: bool,
) -> DashResult<Vec<DevfileMetaData>> {
    if !raw {
        return registry.fetch_devfiles(sources).await;
    }

    let mut devfiles = Vec::new();
    for source in sources {
        devfiles.extend(registry.fetch_registry_metadata(&source.url, source.external).await?);
    }
    Ok(devfiles)
}
