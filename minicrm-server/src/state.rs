//! Application state shared across all request handlers.

use minicrm_core::config::{CampaignRules, ConfigStore};
use minicrm_core::framework::{AnalyticsStore, CampaignLogStore};
use minicrm_core::processors::DepositIngestor;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Ingestion pipeline for `POST /ingest`.
    pub ingestor: DepositIngestor,
    /// Analytical store, used directly for readiness checks.
    pub analytics: Arc<dyn AnalyticsStore>,
    /// Campaign log store, read by `GET /logs`.
    pub campaign_logs: Arc<dyn CampaignLogStore>,
    /// Campaign rules (can be reloaded via SIGHUP).
    pub campaign_rules: ConfigStore<CampaignRules>,
}

impl AppState {
    /// Create a new AppState wiring the ingestor to the given stores.
    pub fn new(
        analytics: Arc<dyn AnalyticsStore>,
        campaign_logs: Arc<dyn CampaignLogStore>,
        campaign_rules: ConfigStore<CampaignRules>,
    ) -> Self {
        let ingestor = DepositIngestor::new(
            analytics.clone(),
            campaign_logs.clone(),
            campaign_rules.clone(),
        );
        Self {
            ingestor,
            analytics,
            campaign_logs,
            campaign_rules,
        }
    }
}
