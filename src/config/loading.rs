//! Configuration loading functions.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::ConfigError;
use super::types::Config;

const PROJECT_CONFIG_NAMES: [&str; 4] = [
    ".rewrite-gate.yaml",
    ".rewrite-gate.yml",
    ".rewrite-gate.json",
    ".rewrite-gate.toml",
];

impl Config {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                path: path.display().to_string(),
                source: e,
            })?,
            "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: path.display().to_string(),
                source: e,
            })?,
            "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
                path: path.display().to_string(),
                source: e,
            })?,
            _ => {
                return Err(ConfigError::UnsupportedFormat(
                    path.display().to_string(),
                    ext,
                ));
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the project directory or global config.
    ///
    /// Search order:
    /// 1. `.rewrite-gate.{yaml,yml,json,toml}` in the project root
    /// 2. `<config dir>/rewrite-gate/config.yaml`
    /// 3. Default configuration
    ///
    /// The first config file found must load; a broken one is an error.
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(root) = project_root {
            for filename in PROJECT_CONFIG_NAMES {
                let path = root.join(filename);
                if path.exists() {
                    let config = Self::from_file(&path)?;
                    debug!(path = %path.display(), "Loaded project config");
                    return Ok(config);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let global_config = config_dir.join("rewrite-gate").join("config.yaml");
            if global_config.exists() {
                let config = Self::from_file(&global_config)?;
                debug!(path = %global_config.display(), "Loaded global config");
                return Ok(config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}
