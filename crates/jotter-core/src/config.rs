use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::model::DEFAULT_PAGE_SIZE;

/// Environment variable overriding `api.base_url`
pub const BASE_URL_ENV: &str = "JOTTER_API_BASE_URL";

/// Top-level configuration for Jotter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JotterConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote notes service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `notes/` endpoints hang off
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page size the server paginates with
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// How long an alert stays visible before it is dismissed automatically
    #[serde(default = "default_alert_duration_ms")]
    pub duration_ms: u64,
}

/// Defaults for the dummy data generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkConfig {
    #[serde(default = "default_total_records")]
    pub total_records: u32,
    /// Must divide `total_records` evenly
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// env_logger filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_alert_duration_ms() -> u64 {
    3000
}

fn default_total_records() -> u32 {
    100
}

fn default_batch_size() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_alert_duration_ms(),
        }
    }
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            total_records: default_total_records(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl JotterConfig {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Load config from a specific path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }

    /// Apply `JOTTER_API_BASE_URL` if it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        self
    }
}
