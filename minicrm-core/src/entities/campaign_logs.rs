use minicrm_sdk::objects::{CampaignAction, CampaignLog, ListCampaignLogsQuery, clamp_pagination};
use mongodb::bson::{self, doc};
use mongodb::options::FindOptions;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::unix_millis;

/// A campaign log entry as stored in the `campaign_logs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignLogDocument {
    pub event_id: String,
    pub player_id: String,
    pub action: CampaignAction,
    pub amount: f64,
    pub timestamp: bson::DateTime,
}

impl CampaignLogDocument {
    pub fn new(
        event_id: Uuid,
        player_id: String,
        action: CampaignAction,
        amount: f64,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: event_id.to_string(),
            player_id,
            action,
            amount,
            timestamp: bson::DateTime::from_millis(unix_millis(timestamp)),
        }
    }

    pub fn timestamp(&self) -> Result<OffsetDateTime, time::error::ComponentRange> {
        OffsetDateTime::from_unix_timestamp_nanos(
            i128::from(self.timestamp.timestamp_millis()) * 1_000_000,
        )
    }

    pub fn into_campaign_log(self) -> Result<CampaignLog, time::error::ComponentRange> {
        let timestamp = self.timestamp()?;
        Ok(CampaignLog {
            event_id: self.event_id,
            player_id: self.player_id,
            action: self.action,
            amount: self.amount,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// List campaign logs, optionally for a single player, oldest first.
///
/// `limit: None` returns every matching entry.
pub struct ListCampaignLogs {
    pub player_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ListCampaignLogs {
    /// MongoDB filter document for this query.
    pub fn filter(&self) -> bson::Document {
        match &self.player_id {
            Some(player_id) => doc! { "player_id": player_id },
            None => doc! {},
        }
    }

    /// Oldest first, ties broken by insertion order.
    pub fn find_options(&self) -> FindOptions {
        FindOptions::builder()
            .sort(doc! { "timestamp": 1, "_id": 1 })
            .skip(u64::try_from(self.offset).unwrap_or(0))
            .limit(self.limit)
            .build()
    }
}

impl From<ListCampaignLogsQuery> for ListCampaignLogs {
    fn from(query: ListCampaignLogsQuery) -> Self {
        let (limit, offset) = clamp_pagination(query.limit, query.offset);
        Self {
            player_id: query
                .player_id
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            limit,
            offset,
        }
    }
}
