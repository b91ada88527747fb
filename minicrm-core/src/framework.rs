//! Store seams shared by the ingestion pipeline and the HTTP layer.
//!
//! The analytical (columnar) store and the operational (document) store are
//! written independently; there is no transaction spanning both.

use crate::entities::campaign_logs::{CampaignLogDocument, ListCampaignLogs};
use crate::entities::deposit_events::DepositEventRow;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("clickhouse error: {0}")]
    ClickHouse(#[from] clickhouse::error::Error),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A stored timestamp could not be represented.
    #[error("timestamp out of range: {0}")]
    Timestamp(#[from] time::error::ComponentRange),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only sink for deposit events (ClickHouse in production).
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Append one deposit row.
    async fn insert_deposit_event(&self, row: DepositEventRow) -> Result<(), StoreError>;

    /// Create the backing table if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Check that the store answers.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Campaign log storage (MongoDB in production).
#[async_trait]
pub trait CampaignLogStore: Send + Sync {
    async fn insert_campaign_log(&self, log: CampaignLogDocument) -> Result<(), StoreError>;

    /// List entries ordered by timestamp ascending.
    async fn list_campaign_logs(
        &self,
        query: ListCampaignLogs,
    ) -> Result<Vec<CampaignLogDocument>, StoreError>;

    /// Create secondary indexes if they do not exist yet.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
