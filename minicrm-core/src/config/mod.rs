//! Runtime configuration types.
//!
//! These are the validated values the server works with. Loading and parsing
//! the TOML file is handled by the server crate.

mod campaign;
mod config_store;
mod stores;

pub use campaign::{CampaignRules, DEFAULT_BONUS_THRESHOLD};
pub use config_store::ConfigStore;
pub use stores::{ClickHouseConfig, MongoConfig};
