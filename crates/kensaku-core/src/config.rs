use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::KensakuError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,
}

/// Settings for a single NZBIndex provider instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Feed endpoint; the encoded query is appended after `?`.
    pub search_url: String,
    /// Retention window in days, sent as the `age` parameter.
    pub retention_days: u32,
    pub min_call_interval_secs: u64,
    pub nfo_cache_ttl_days: u64,
    pub request_timeout_secs: u64,
}

impl ProviderConfig {
    pub fn min_call_interval(&self) -> Duration {
        Duration::from_secs(self.min_call_interval_secs)
    }

    pub fn nfo_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.nfo_cache_ttl_days * 24 * 60 * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        AppConfig::default().provider
    }
}

impl AppConfig {
    /// Load config: the user file if it exists, otherwise built-in defaults.
    pub fn load() -> Result<Self, KensakuError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| KensakuError::Config(e.to_string()))
        }
    }

    /// Load config from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self, KensakuError> {
        let user_str =
            std::fs::read_to_string(path).map_err(|e| KensakuError::Config(e.to_string()))?;
        toml::from_str(&user_str).map_err(|e| KensakuError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), KensakuError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), KensakuError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| KensakuError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "kensaku")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
