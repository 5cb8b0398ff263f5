//! Configuration loading for the taskmdp service

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use tracing::info;

use taskmdp_rl::preset;
use taskmdp_rl::{EngineParams, MdpDefinition, ModelTables, SolverConfig};

/// Prefix for environment overrides, e.g. `TASKMDP__ENGINE__SEED=7`.
///
/// Overriding a solver field from the environment alone also needs
/// `TASKMDP__SOLVER__ALGORITHM`, since the section is tagged by it.
pub const ENV_PREFIX: &str = "TASKMDP";

/// Configuration for the service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub engine: EngineParams,
    pub solver: SolverConfig,
    pub model: ModelConfig,
    pub service: ServiceSection,
}

/// Where the MDP definition comes from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Built-in model name, used when `path` is unset
    pub preset: String,
    /// JSON or TOML file holding an `MdpDefinition`
    pub path: Option<PathBuf>,
    /// JSON file of exported model tables to replay as seeds
    pub tables: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            preset: "project".to_string(),
            path: None,
            tables: None,
        }
    }
}

impl ModelConfig {
    /// Resolve the configured definition, applying replayed tables if any
    pub fn definition(&self) -> Result<MdpDefinition> {
        let definition = match &self.path {
            Some(path) => read_definition(path)?,
            None => match self.preset.as_str() {
                "project" => preset::project_management(),
                other => bail!("Unknown model preset: {other}"),
            },
        };

        match &self.tables {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read model tables {}", path.display()))?;
                let tables = ModelTables::from_json(&content)
                    .with_context(|| format!("Failed to parse model tables {}", path.display()))?;
                info!("Replaying model tables from: {:?}", path);
                Ok(definition.with_seeds(&tables))
            }
            None => Ok(definition),
        }
    }
}

fn read_definition(path: &Path) -> Result<MdpDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model definition {}", path.display()))?;

    let definition = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML model {}", path.display()))?
    } else {
        MdpDefinition::from_json(&content)
            .with_context(|| format!("Failed to parse JSON model {}", path.display()))?
    };

    info!("Loaded model definition from: {:?}", path);
    Ok(definition)
}

/// Service behaviour around the engine
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Re-run the solver after this many recorded experiences; 0 disables
    pub recompute_interval: u64,
}

impl ServiceConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file();
        if config_path.is_none() {
            info!("No config file found, using defaults");
        }
        Self::load_with(config_path.as_deref(), ENV_PREFIX)
    }

    /// Load from an explicit file (if any) plus environment variables with `env_prefix`
    pub fn load_with(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let loaded: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check engine and solver parameters without building anything
    pub fn validate(&self) -> Result<()> {
        self.engine
            .validate()
            .context("Invalid engine configuration")?;
        self.solver
            .validate()
            .context("Invalid solver configuration")?;
        Ok(())
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: TASKMDP_CONFIG env, ./taskmdp.toml, ~/.config/taskmdp/taskmdp.toml
        if let Ok(path) = std::env::var("TASKMDP_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("taskmdp.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("taskmdp").join("taskmdp.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();

        assert_eq!(config.engine, EngineParams::default());
        assert_eq!(config.solver.gamma(), 0.95);
        assert_eq!(config.model.preset, "project");
        assert!(config.model.path.is_none());
        assert_eq!(config.service.recompute_interval, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_definition() {
        let definition = ModelConfig::default().definition().unwrap();
        assert_eq!(definition.actions.len(), 15);
    }

    #[test]
    fn test_unknown_preset() {
        let model = ModelConfig {
            preset: "rocket_launch".to_string(),
            ..ModelConfig::default()
        };
        let err = model.definition().unwrap_err();
        assert!(err.to_string().contains("rocket_launch"));
    }

    #[test]
    fn test_missing_model_file() {
        let model = ModelConfig {
            path: Some(PathBuf::from("/nonexistent/model.json")),
            ..ModelConfig::default()
        };
        assert!(model.definition().is_err());
    }
}
