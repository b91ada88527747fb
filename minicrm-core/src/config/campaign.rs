//! Campaign rules.

use minicrm_sdk::objects::CampaignAction;

pub const DEFAULT_BONUS_THRESHOLD: f64 = 1000.0;

/// Decides which deposits produce a campaign log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRules {
    /// Deposits with `amount >= bonus_threshold` qualify.
    pub bonus_threshold: f64,
    /// Action recorded for qualifying deposits.
    pub action: CampaignAction,
}

impl CampaignRules {
    pub fn new(bonus_threshold: f64) -> Self {
        Self {
            bonus_threshold,
            action: CampaignAction::BonusMessage,
        }
    }

    /// Whether a deposit of `amount` qualifies for the campaign.
    pub fn qualifies(&self, amount: f64) -> bool {
        amount >= self.bonus_threshold
    }
}

impl Default for CampaignRules {
    fn default() -> Self {
        Self::new(DEFAULT_BONUS_THRESHOLD)
    }
}
