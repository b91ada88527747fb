//! Configuration module for minicrm-server.
//!
//! Handles loading configuration from the TOML file, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use minicrm_core::config::{CampaignRules, ClickHouseConfig, MongoConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides `[clickhouse] url`.
pub const CLICKHOUSE_URL_ENV: &str = "CLICKHOUSE_URL";
/// Overrides `[clickhouse] password`.
pub const CLICKHOUSE_PASSWORD_ENV: &str = "CLICKHOUSE_PASSWORD";
/// Overrides `[mongodb] uri`.
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid clickhouse url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Server settings that only take effect on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub clickhouse: ClickHouseConfig,
    pub mongodb: MongoConfig,
    pub campaign: CampaignRules,
}

impl LoadedConfig {
    /// Whether settings that need a restart differ between two loads.
    pub fn requires_restart(&self, other: &LoadedConfig) -> bool {
        self.server != other.server
            || self.clickhouse != other.clickhouse
            || self.mongodb != other.mongodb
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (falling back to defaults if it does not exist)
    /// 2. Apply environment overrides
    /// 3. Apply CLI overrides
    /// 4. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = if self.config_path.exists() {
            let config_content = std::fs::read_to_string(&self.config_path)?;
            toml::from_str(&config_content)?
        } else {
            tracing::warn!(
                path = %self.config_path.display(),
                "Config file not found, using defaults"
            );
            FileConfig::default()
        };

        apply_env_overrides(&mut file_config, |key| std::env::var(key).ok());

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;

        Ok(build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

fn apply_env_overrides(config: &mut FileConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(CLICKHOUSE_URL_ENV) {
        config.clickhouse.url = url;
    }
    if let Some(password) = lookup(CLICKHOUSE_PASSWORD_ENV) {
        config.clickhouse.password = password;
    }
    if let Some(uri) = lookup(MONGODB_URI_ENV) {
        config.mongodb.uri = uri;
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let threshold = config.campaign.bonus_threshold;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "campaign.bonus_threshold must be a non-negative number, got {threshold}"
        )));
    }

    let url = url::Url::parse(&config.clickhouse.url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "clickhouse.url must use http or https, got {}",
            url.scheme()
        )));
    }

    if !config.mongodb.uri.starts_with("mongodb://")
        && !config.mongodb.uri.starts_with("mongodb+srv://")
    {
        return Err(ConfigError::ValidationError(
            "mongodb.uri must start with mongodb:// or mongodb+srv://".to_string(),
        ));
    }

    for (name, value) in [
        ("clickhouse.database", &config.clickhouse.database),
        ("clickhouse.table", &config.clickhouse.table),
        ("mongodb.database", &config.mongodb.database),
        ("mongodb.collection", &config.mongodb.collection),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!("{name} must not be empty")));
        }
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let FileConfig {
        server,
        clickhouse,
        mongodb,
        campaign,
    } = file_config;

    LoadedConfig {
        server: ServerConfig {
            listen: server.listen,
        },
        clickhouse: ClickHouseConfig {
            url: clickhouse.url,
            database: clickhouse.database,
            user: clickhouse.user,
            password: clickhouse.password,
            table: clickhouse.table,
        },
        mongodb: MongoConfig {
            uri: mongodb.uri,
            database: mongodb.database,
            collection: mongodb.collection,
        },
        campaign: CampaignRules::new(campaign.bonus_threshold),
    }
}
