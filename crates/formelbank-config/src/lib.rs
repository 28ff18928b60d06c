//! Workbench configuration: TOML file with per-field defaults plus
//! environment overrides for the engine endpoint.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_FORMELBANK_CONFIG: &str = "FORMELBANK_CONFIG";
pub const ENV_ENGINE_BASE_URL: &str = "FORMELBANK_ENGINE_URL";
pub const ENV_ENGINE_TIMEOUT_SECS: &str = "FORMELBANK_ENGINE_TIMEOUT_SECS";

const DEFAULT_CONFIG_PATH: &str = "formelbank.toml";
const DEFAULT_ENGINE_BASE_URL: &str = "http://127.0.0.1:7117";
const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_PATH: &str = "./formelbank.log";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Message(String),
}

impl ConfigError {
    fn configuration(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfigToml {
    #[serde(default = "default_engine_base_url")]
    pub base_url: String,
    #[serde(default = "default_engine_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Whether this installation can reach an engine at all. A host
    /// without one still gets a running workbench whose engine calls
    /// fail with a visible unavailable error.
    #[serde(default = "default_engine_available")]
    pub available: bool,
}

impl Default for EngineConfigToml {
    fn default() -> Self {
        Self {
            base_url: default_engine_base_url(),
            request_timeout_secs: default_engine_timeout_secs(),
            available: default_engine_available(),
        }
    }
}

impl EngineConfigToml {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfigToml {
    #[serde(default = "default_log_path")]
    pub path: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfigToml {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormelbankConfig {
    #[serde(default)]
    pub engine: EngineConfigToml,
    #[serde(default)]
    pub log: LogConfigToml,
}

/// Loads the config named by `FORMELBANK_CONFIG` (default
/// `formelbank.toml`); a missing file yields defaults. Environment
/// overrides for the engine endpoint are applied afterwards.
pub fn load_from_env() -> Result<FormelbankConfig, ConfigError> {
    let path = match std::env::var(ENV_FORMELBANK_CONFIG) {
        Ok(raw) if !raw.trim().is_empty() => raw,
        Ok(_) | Err(std::env::VarError::NotPresent) => DEFAULT_CONFIG_PATH.to_owned(),
        Err(_) => {
            return Err(ConfigError::configuration(
                "FORMELBANK_CONFIG contained invalid UTF-8",
            ))
        }
    };
    let mut config = load_from_path(path)?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<FormelbankConfig, ConfigError> {
    let path = path.as_ref();
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FormelbankConfig::default());
        }
        Err(error) => {
            return Err(ConfigError::configuration(format!(
                "Failed to read config from {}: {error}",
                path.display()
            )));
        }
    };

    toml::from_str(&raw).map_err(|error| {
        ConfigError::configuration(format!(
            "Failed to parse config from {}: {error}",
            path.display()
        ))
    })
}

fn apply_env_overrides(config: &mut FormelbankConfig) -> Result<(), ConfigError> {
    if let Ok(base_url) = std::env::var(ENV_ENGINE_BASE_URL) {
        if !base_url.trim().is_empty() {
            config.engine.base_url = base_url;
        }
    }
    if let Ok(raw) = std::env::var(ENV_ENGINE_TIMEOUT_SECS) {
        if !raw.trim().is_empty() {
            config.engine.request_timeout_secs = raw.trim().parse().map_err(|_| {
                ConfigError::configuration(format!(
                    "FORMELBANK_ENGINE_TIMEOUT_SECS must be a number of seconds, got '{raw}'"
                ))
            })?;
        }
    }
    Ok(())
}

fn default_engine_base_url() -> String {
    DEFAULT_ENGINE_BASE_URL.to_owned()
}

fn default_engine_timeout_secs() -> u64 {
    DEFAULT_ENGINE_TIMEOUT_SECS
}

fn default_engine_available() -> bool {
    true
}

fn default_log_path() -> String {
    DEFAULT_LOG_PATH.to_owned()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}
