//! Store implementations behind the seams in [`crate::framework`].
//!
//! - [`ClickHouseAnalytics`]: deposit events into a ClickHouse MergeTree table
//! - [`MongoCampaignLogs`]: campaign log documents in a MongoDB collection
//! - `memory` (feature `testing`): in-process doubles for tests

mod analytics;
mod campaign_logs;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use analytics::ClickHouseAnalytics;
pub use campaign_logs::MongoCampaignLogs;
