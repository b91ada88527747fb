use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A deposit made by a player, as posted to `POST /ingest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositEvent {
    pub player_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepositValidationError {
    #[error("player_id must not be empty")]
    EmptyPlayerId,
    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("amount must not be negative")]
    NegativeAmount,
}

impl DepositEvent {
    pub fn new(player_id: impl Into<String>, amount: f64) -> Self {
        Self {
            player_id: player_id.into(),
            amount,
        }
    }

    /// Reject events that cannot be stored meaningfully.
    pub fn validate(&self) -> Result<(), DepositValidationError> {
        if self.player_id.trim().is_empty() {
            return Err(DepositValidationError::EmptyPlayerId);
        }
        if !self.amount.is_finite() {
            return Err(DepositValidationError::NonFiniteAmount);
        }
        if self.amount < 0.0 {
            return Err(DepositValidationError::NegativeAmount);
        }
        Ok(())
    }
}

/// What happened to the campaign side of an ingested deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignDecision {
    /// The amount was below the bonus threshold; nothing was written.
    NotEligible,
    /// A campaign log entry was written.
    Logged,
    /// The amount qualified but the campaign log write failed.
    Failed,
}

/// Acknowledgment returned with `202 Accepted` from `POST /ingest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Server-assigned event identifier, shared by the analytical row and
    /// the campaign log entry.
    pub event_id: Uuid,
    /// Server receive time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: time::OffsetDateTime,
    /// Whether the analytical row was written.
    pub analytics_recorded: bool,
    pub campaign: CampaignDecision,
}
