//! Liveness and readiness payloads.

use serde::{Deserialize, Serialize};

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Response of `GET /ready`.
///
/// Each store field is either `"up"` or `"down"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyStatus {
    pub status: String,
    pub analytics: String,
    pub campaign_logs: String,
}
