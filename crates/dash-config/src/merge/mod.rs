//! Configuration lookup, fallback logic, and environment overrides

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use dash_core::error::DashError;
use dash_core::types::RegistrySource;
use crate::ConfigResult;
use crate::toml::{validate_config, DashboardToml};

/// File name looked up from the working directory upwards
pub const CONFIG_FILE_NAME: &str = "dashboard.toml";

/// Adds an internal registry
pub const ENV_REGISTRY_URL: &str = "DASH_REGISTRY_URL";
/// Adds an external registry
pub const ENV_EXTERNAL_REGISTRY_URL: &str = "DASH_EXTERNAL_REGISTRY_URL";
/// Sets the backend bearer token
pub const ENV_TOKEN: &str = "DASH_TOKEN";

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// File given explicitly
    Explicit(Utf8PathBuf),
    /// Project dashboard.toml
    Project(Utf8PathBuf),
    /// User-wide config file
    Global(Utf8PathBuf),
    /// Nothing found, built-in defaults
    Default,
}

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load configuration: explicit file, else project file, else the
    /// user-wide file, else defaults.
    pub async fn load(&self, explicit: Option<&Utf8Path>) -> ConfigResult<(DashboardToml, ConfigSource)> {
        if let Some(path) = explicit {
            let config = crate::toml::load_from_file(path).await?;
            return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Some(path) = self.find_project_config() {
            let config = crate::toml::load_from_file(&path).await?;
            return Ok((config, ConfigSource::Project(path)));
        }

        if let Some(path) = global_config_path()? {
            if path.exists() {
                let config = crate::toml::load_from_file(&path).await?;
                return Ok((config, ConfigSource::Global(path)));
            }
        }

        debug!("no {} found, using defaults", CONFIG_FILE_NAME);
        Ok((DashboardToml::default(), ConfigSource::Default))
    }

    /// Find dashboard.toml in the working directory or its parents
    pub fn find_project_config(&self) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.exists())
    }
}

/// `<config dir>/dash/dashboard.toml`, if the platform has a config dir
fn global_config_path() -> ConfigResult<Option<Utf8PathBuf>> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(None);
    };

    let config_dir = Utf8PathBuf::try_from(config_dir)
        .map_err(|e| DashError::ConfigValidation {
            field: "config_dir".to_string(),
            reason: format!("Invalid config directory path: {}", e),
        })?;

    Ok(Some(config_dir.join("dash").join(CONFIG_FILE_NAME)))
}

/// Apply `DASH_*` overrides from `vars` and re-validate.
///
/// Registries named by the environment are appended unless already listed.
pub fn apply_env_overrides<I>(mut config: DashboardToml, vars: I) -> ConfigResult<DashboardToml>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, value) in vars {
        let registry = match name.as_str() {
            ENV_REGISTRY_URL => RegistrySource::internal(value),
            ENV_EXTERNAL_REGISTRY_URL => RegistrySource::external(value),
            ENV_TOKEN => {
                config.backend.token = Some(value);
                continue;
            }
            _ => continue,
        };

        if !config.registries.contains(&registry) {
            debug!(url = %registry.url, external = registry.external, "registry added from environment");
            config.registries.push(registry);
        }
    }

    validate_config(&config)?;
    Ok(config)
}
