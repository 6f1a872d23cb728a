use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use crate::error::{OrganizerError, Result};

/// Environment variable holding the remote classifier's API key.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model_name() -> String {
    "gpt-5-mini".to_string()
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_min_confidence() -> f64 {
    0.65
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            api_base_url: default_api_base_url(),
            min_confidence: default_min_confidence(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    fn get_config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| OrganizerError::Config("Could not determine home directory".into()))?;
        Ok(home_dir.join(".fs-sorter").join("config.json"))
    }

    pub fn load() -> Result<Option<Config>> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            OrganizerError::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        let config = Self::from_json(&content)?;
        Ok(Some(config))
    }

    pub fn load_or_default() -> Result<Config> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn from_json(content: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| OrganizerError::Config(format!("Invalid configuration file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        self.validate()?;
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                OrganizerError::Config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| OrganizerError::Config(e.to_string()))?;
        fs::write(&config_path, content).map_err(|e| {
            OrganizerError::Config(format!("Failed to write {}: {}", config_path.display(), e))
        })?;

        Ok(config_path)
    }

    pub fn get_config_file_path() -> Result<PathBuf> {
        Self::get_config_path()
    }

    pub fn validate(&self) -> Result<()> {
        validate_min_confidence(self.min_confidence)?;
        if self.request_timeout_secs == 0 {
            return Err(OrganizerError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.model_name.trim().is_empty() {
            return Err(OrganizerError::Config("model_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn validate_min_confidence(value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(OrganizerError::Config(format!(
            "min_confidence must be between 0 and 1, got {}",
            value
        )));
    }
    Ok(())
}

fn load_dotenv() {
    static DOTENV: Once = Once::new();
    DOTENV.call_once(|| {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
    });
}

/// The API key, if one is configured in the environment or a `.env` file.
pub fn api_key() -> Option<String> {
    load_dotenv();
    env::var(API_KEY_ENV_VAR).ok().filter(|key| !key.trim().is_empty())
}

pub fn api_key_present() -> bool {
    api_key().is_some()
}
