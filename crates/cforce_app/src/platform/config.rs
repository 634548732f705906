use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cforce_engine::{EngineConfig, GatewaySettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
use cforce_logging::{cforce_info, cforce_warn};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "cforce.ron";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no API key found; set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: String,
    pub connect_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("reports"),
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Reads `path` if present. A missing or malformed file yields defaults.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                cforce_warn!("Failed to read config from {:?}: {}", path, err);
                return Self::default();
            }
        };
        match ron::from_str(&content) {
            Ok(config) => {
                cforce_info!("Loaded config from {:?}", path);
                config
            }
            Err(err) => {
                cforce_warn!("Failed to parse config from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            model: self.model.clone(),
            ..EngineConfig::default_with_output(&self.output_dir)
        }
    }

    pub fn gateway_settings(&self, api_key: String) -> GatewaySettings {
        GatewaySettings {
            base_url: self.base_url.clone(),
            api_key,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..GatewaySettings::default()
        }
    }
}

/// First non-blank value among the supported key variables.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(|name| std::env::var(name).ok())
}

fn api_key_from<F>(lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}
