//! DepositIngestor processor.
//!
//! The DepositIngestor is responsible for:
//! - Assigning an event id and receive timestamp to each deposit
//! - Writing one row to the analytical store, unconditionally
//! - Writing one campaign log entry when the amount reaches the bonus threshold
//!
//! The two writes are independent. A failure of one is logged and reported in
//! the [`IngestOutcome`] but never prevents the other.

use crate::config::{CampaignRules, ConfigStore};
use crate::entities::campaign_logs::CampaignLogDocument;
use crate::entities::deposit_events::DepositEventRow;
use crate::entities::now_millis;
use crate::framework::{AnalyticsStore, CampaignLogStore};
use kanau::processor::Processor;
use minicrm_sdk::objects::{CampaignDecision, DepositEvent, IngestReceipt};
use std::convert::Infallible;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, error, info};
use uuid::Uuid;

/// A deposit to ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDeposit {
    pub player_id: String,
    pub amount: f64,
}

impl From<DepositEvent> for RecordDeposit {
    fn from(event: DepositEvent) -> Self {
        Self {
            player_id: event.player_id.trim().to_string(),
            amount: event.amount,
        }
    }
}

/// Result of ingesting a single deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub event_id: Uuid,
    pub timestamp: OffsetDateTime,
    pub analytics_recorded: bool,
    pub campaign: CampaignDecision,
}

impl From<IngestOutcome> for IngestReceipt {
    fn from(outcome: IngestOutcome) -> Self {
        IngestReceipt {
            event_id: outcome.event_id,
            timestamp: outcome.timestamp,
            analytics_recorded: outcome.analytics_recorded,
            campaign: outcome.campaign,
        }
    }
}

/// Fans one deposit out to the analytical store and, conditionally, the
/// campaign log store.
#[derive(Clone)]
pub struct DepositIngestor {
    analytics: Arc<dyn AnalyticsStore>,
    campaign_logs: Arc<dyn CampaignLogStore>,
    rules: ConfigStore<CampaignRules>,
}

impl DepositIngestor {
    pub fn new(
        analytics: Arc<dyn AnalyticsStore>,
        campaign_logs: Arc<dyn CampaignLogStore>,
        rules: ConfigStore<CampaignRules>,
    ) -> Self {
        Self {
            analytics,
            campaign_logs,
            rules,
        }
    }

    async fn log_campaign(
        &self,
        event_id: Uuid,
        deposit: RecordDeposit,
        timestamp: OffsetDateTime,
    ) -> CampaignDecision {
        let (qualifies, action, threshold) = {
            let rules = self.rules.read().await;
            (
                rules.qualifies(deposit.amount),
                rules.action,
                rules.bonus_threshold,
            )
        };

        if !qualifies {
            debug!(%event_id, amount = deposit.amount, threshold, "Deposit below bonus threshold");
            return CampaignDecision::NotEligible;
        }

        let document =
            CampaignLogDocument::new(event_id, deposit.player_id, action, deposit.amount, timestamp);

        match self.campaign_logs.insert_campaign_log(document).await {
            Ok(()) => {
                info!(%event_id, action = action.as_str(), "Campaign log entry written");
                CampaignDecision::Logged
            }
            Err(e) => {
                error!(%event_id, error = %e, "Failed to write campaign log entry");
                CampaignDecision::Failed
            }
        }
    }
}

impl Processor<RecordDeposit> for DepositIngestor {
    type Output = IngestOutcome;
    type Error = Infallible;

    async fn process(&self, deposit: RecordDeposit) -> Result<IngestOutcome, Infallible> {
        let event_id = Uuid::new_v4();
        let timestamp = now_millis();

        let row = DepositEventRow::deposit(
            event_id,
            deposit.player_id.clone(),
            deposit.amount,
            timestamp,
        );
        let analytics_recorded = match self.analytics.insert_deposit_event(row).await {
            Ok(()) => true,
            Err(e) => {
                error!(%event_id, error = %e, "Failed to write deposit event to analytics store");
                false
            }
        };

        let campaign = self.log_campaign(event_id, deposit, timestamp).await;

        Ok(IngestOutcome {
            event_id,
            timestamp,
            analytics_recorded,
            campaign,
        })
    }
}
