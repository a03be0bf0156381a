//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RINGSNAP_*)
//! 2. TOML config file (if RINGSNAP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RINGSNAP_*)
/// 2. TOML config file (if RINGSNAP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite icon cache database.
    ///
    /// Set via RINGSNAP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path to the rules JSON file.
    ///
    /// Set via RINGSNAP_RULES_PATH environment variable.
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    /// User-Agent string for favicon requests.
    ///
    /// Set via RINGSNAP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per favicon request.
    ///
    /// Set via RINGSNAP_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via RINGSNAP_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Pixel size requested from sizable favicon sources.
    ///
    /// Set via RINGSNAP_ICON_SIZE environment variable.
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./ringsnap-icons.sqlite")
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("./rules.json")
}

fn default_user_agent() -> String {
    "ringsnap/0.1".into()
}

fn default_max_bytes() -> usize {
    1_048_576 // 1MB
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_icon_size() -> u32 {
    32
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            rules_path: default_rules_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            icon_size: default_icon_size(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `RINGSNAP_`
    /// 2. TOML file from `RINGSNAP_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RINGSNAP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RINGSNAP_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
