//! CLI configuration
//!
//! TOML-backed settings for the local service: which network and contract
//! scope the ledger binds to, and how sessions are cached on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CipherboardConfig {
    /// Service binding
    #[serde(default)]
    pub service: ServiceSettings,

    /// Session policy
    #[serde(default)]
    pub session: SessionSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CipherboardConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Configuration for a named environment
    pub fn for_network(network: &str) -> Self {
        match network {
            "testnet" => Self::testnet(),
            _ => Self::local(),
        }
    }

    /// Local single-process configuration
    pub fn local() -> Self {
        Self::default()
    }

    /// Testnet configuration
    pub fn testnet() -> Self {
        Self {
            service: ServiceSettings {
                network: "testnet".to_string(),
                network_id: 9000,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.duration_days == 0 {
            return Err(ConfigError::Invalid(
                "Session duration must be at least one day".to_string(),
            ));
        }
        if self.service.contract_label.is_empty() {
            return Err(ConfigError::Invalid(
                "Contract label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Service binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Network name (local, testnet)
    pub network: String,

    /// Numeric network identity, compared by the staleness guard
    pub network_id: u64,

    /// Label the score contract scope is derived from
    pub contract_label: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            network: "local".to_string(),
            network_id: 1,
            contract_label: "cipherboard/scores".to_string(),
        }
    }
}

/// Session cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Validity window in whole days
    pub duration_days: u64,

    /// Cache directory name under the data dir
    pub cache_dir: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_days: cipherboard_client::SESSION_DURATION_DAYS,
            cache_dir: "sessions".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,

    /// Output format (text, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Get default data directory
pub fn default_data_dir(network: &str) -> PathBuf {
    let base = directories::ProjectDirs::from("dev", "cipherboard", "cipherboard")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".cipherboard"));

    base.join(network)
}

/// Get default config file path
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}
