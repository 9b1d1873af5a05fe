use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PRO_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_THINKING_BUDGET: u32 = 32768;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables checked for the credential, in order
const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_course: Option<String>,
}

/// Everything the gateway needs, with defaults applied and the credential resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub api_key: String,
    pub base_url: String,
    pub fast_model: String,
    pub pro_model: String,
    pub thinking_budget: u32,
    pub timeout_secs: u64,
}

impl GatewaySettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            pro_model: DEFAULT_PRO_MODEL.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_last_course(course: &str) -> Result<(), ConfigError> {
        Self::save_last_course_to(&Self::get_config_path()?, course)
    }

    /// Update only `last_course`. An unreadable file is left alone rather than replaced.
    pub fn save_last_course_to(path: &Path, course: &str) -> Result<(), ConfigError> {
        let mut config = Self::load_from(path)?;
        config.last_course = Some(course.to_string());
        config.save_to(path)
    }

    /// Resolve the gateway settings, reading the credential from the environment first.
    /// A missing credential is fatal.
    pub fn gateway_settings(&self) -> Result<GatewaySettings, ConfigError> {
        let env_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        self.gateway_settings_with(env_key)
    }

    pub fn gateway_settings_with(
        &self,
        env_key: Option<String>,
    ) -> Result<GatewaySettings, ConfigError> {
        let api_key = env_key
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                let location = Self::get_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.json".to_string());
                ConfigError::MissingApiKey(location)
            })?;

        Ok(GatewaySettings {
            api_key,
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            fast_model: self
                .fast_model
                .clone()
                .unwrap_or_else(|| DEFAULT_FAST_MODEL.to_string()),
            pro_model: self
                .pro_model
                .clone()
                .unwrap_or_else(|| DEFAULT_PRO_MODEL.to_string()),
            thinking_budget: self.thinking_budget.unwrap_or(DEFAULT_THINKING_BUDGET),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("codemaster"))
    }

    fn get_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
