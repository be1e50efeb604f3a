//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API location, the session store backend and the last
//! e-mail used to sign in.
//!
//! Configuration is stored at `~/.config/gobarber/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::api::ApiClient;
use crate::storage::{FileStore, KeychainStore, SessionStore};

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "gobarber";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "GOBARBER_API_URL";

/// Where the persisted session record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON file in the data directory
    #[default]
    File,
    /// OS keychain
    Keychain,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub store: StoreBackend,
    pub last_email: Option<String>,
    #[serde(default)]
    pub log_to_file: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the file-backed session store
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for log files
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// API base URL: environment first, then config, then the default.
    pub fn api_base_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::with_timeout(self.api_base_url(), self.request_timeout())
            .context("Failed to build HTTP client")
    }

    /// Open the configured session store.
    pub fn session_store(&self) -> Result<Box<dyn SessionStore>> {
        Ok(match self.store {
            StoreBackend::File => Box::new(FileStore::in_dir(self.data_dir()?)),
            StoreBackend::Keychain => Box::new(KeychainStore::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.store, StoreBackend::File);
        assert!(!config.log_to_file);
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_config_parses_keychain_backend() {
        let config: Config =
            serde_json::from_str(r#"{"store":"keychain","api_base_url":"https://api.example.com","request_timeout_secs":5}"#)
                .unwrap();
        assert_eq!(config.store, StoreBackend::Keychain);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.api_base_url.as_deref(), Some("https://api.example.com"));
    }
}
