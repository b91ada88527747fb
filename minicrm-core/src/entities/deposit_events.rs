use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Value of the `event_type` column for deposits.
pub const DEPOSIT_EVENT_TYPE: &str = "DEPOSIT";

/// One row of the analytical `events` table.
///
/// Field order is the column order of the table.
#[derive(Debug, Clone, PartialEq, Row, Serialize, Deserialize)]
pub struct DepositEventRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub event_id: Uuid,
    pub player_id: String,
    pub event_type: String,
    pub amount: f64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub timestamp: OffsetDateTime,
}

impl DepositEventRow {
    pub fn deposit(event_id: Uuid, player_id: String, amount: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            event_id,
            player_id,
            event_type: DEPOSIT_EVENT_TYPE.to_string(),
            amount,
            timestamp,
        }
    }
}

/// DDL for the events table. The single `?` is bound to the table identifier.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ? (
    event_id   UUID,
    player_id  String,
    event_type LowCardinality(String),
    amount     Float64,
    timestamp  DateTime64(3, 'UTC')
)
ENGINE = MergeTree
ORDER BY (timestamp, player_id)
"#;
