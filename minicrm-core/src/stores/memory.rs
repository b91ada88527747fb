//! In-memory stores for tests and local experiments.
//!
//! Both stores can be switched to an unavailable state to exercise the
//! failure paths of the ingestion pipeline.

use crate::entities::campaign_logs::{CampaignLogDocument, ListCampaignLogs};
use crate::entities::deposit_events::DepositEventRow;
use crate::framework::{AnalyticsStore, CampaignLogStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryAnalyticsStore {
    rows: Mutex<Vec<DepositEventRow>>,
    unavailable: AtomicBool,
}

impl MemoryAnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn rows(&self) -> Vec<DepositEventRow> {
        self.rows.lock().await.clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("analytics store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalyticsStore for MemoryAnalyticsStore {
    async fn insert_deposit_event(&self, row: DepositEventRow) -> Result<(), StoreError> {
        self.check()?;
        self.rows.lock().await.push(row);
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[derive(Default)]
pub struct MemoryCampaignLogStore {
    logs: Mutex<Vec<CampaignLogDocument>>,
    unavailable: AtomicBool,
}

impl MemoryCampaignLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn logs(&self) -> Vec<CampaignLogDocument> {
        self.logs.lock().await.clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("campaign log store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CampaignLogStore for MemoryCampaignLogStore {
    async fn insert_campaign_log(&self, log: CampaignLogDocument) -> Result<(), StoreError> {
        self.check()?;
        self.logs.lock().await.push(log);
        Ok(())
    }

    async fn list_campaign_logs(
        &self,
        query: ListCampaignLogs,
    ) -> Result<Vec<CampaignLogDocument>, StoreError> {
        self.check()?;
        let mut matching: Vec<_> = self
            .logs
            .lock()
            .await
            .iter()
            .filter(|l| query.player_id.as_ref().is_none_or(|p| &l.player_id == p))
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps, like `_id`.
        matching.sort_by_key(|l| l.timestamp);

        let skipped = matching.into_iter().skip(usize::try_from(query.offset).unwrap_or(0));
        Ok(match query.limit {
            Some(limit) => skipped.take(usize::try_from(limit).unwrap_or(0)).collect(),
            None => skipped.collect(),
        })
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
