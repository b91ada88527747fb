//! Campaign log types exposed by `GET /logs`.

use serde::{Deserialize, Serialize};

/// Marketing action taken for a qualifying deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignAction {
    #[serde(rename = "BONUS_MESSAGE")]
    BonusMessage,
}

impl CampaignAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignAction::BonusMessage => "BONUS_MESSAGE",
        }
    }
}

/// A campaign log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignLog {
    pub event_id: String,
    pub player_id: String,
    pub action: CampaignAction,
    pub amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: time::OffsetDateTime,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

const MAX_LIMIT: i64 = 1000;
const MAX_OFFSET: i64 = 100_000;

/// Query parameters for listing campaign logs.
///
/// Without a `limit` every matching entry is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCampaignLogsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

/// Clamp limit and offset to safe maximums.
pub fn clamp_pagination(limit: Option<i64>, offset: i64) -> (Option<i64>, i64) {
    (
        limit.map(|l| l.clamp(1, MAX_LIMIT)),
        offset.clamp(0, MAX_OFFSET),
    )
}
