//! TOML file configuration structures.
//!
//! These structs directly map to the `minicrm-config.toml` file format.
//! Every field has a default, so an empty file (or no file) is valid.

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub clickhouse: ClickHouseConfig,
    pub mongodb: MongoConfig,
    pub campaign: CampaignConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
        }
    }
}

/// ClickHouse section. Uses the HTTP interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClickHouseConfig {
    pub url: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Table receiving deposit events.
    pub table: String,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8123".to_string(),
            database: "default".to_string(),
            user: "default".to_string(),
            password: String::new(),
            table: "events".to_string(),
        }
    }
}

/// MongoDB section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    /// Collection receiving campaign logs.
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "mini_crm".to_string(),
            collection: "campaign_logs".to_string(),
        }
    }
}

/// Campaign section. Reloaded on SIGHUP.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Deposits at or above this amount get a campaign log entry.
    pub bonus_threshold: f64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            bonus_threshold: minicrm_core::config::DEFAULT_BONUS_THRESHOLD,
        }
    }
}
