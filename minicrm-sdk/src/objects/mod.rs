pub mod campaign;
pub mod deposit;
pub mod health;

pub use campaign::{CampaignAction, CampaignLog, ListCampaignLogsQuery, clamp_pagination};
pub use deposit::{CampaignDecision, DepositEvent, DepositValidationError, IngestReceipt};
pub use health::{HealthStatus, ReadyStatus};
