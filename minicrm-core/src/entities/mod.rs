pub mod campaign_logs;
pub mod deposit_events;

use time::OffsetDateTime;

/// Current UTC time truncated to millisecond precision.
///
/// Both stores keep milliseconds, so every timestamp handed out by the
/// pipeline is truncated up front to compare equal after a round trip.
pub fn now_millis() -> OffsetDateTime {
    truncate_to_millis(OffsetDateTime::now_utc())
}

pub fn truncate_to_millis(ts: OffsetDateTime) -> OffsetDateTime {
    ts.replace_nanosecond(ts.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(ts)
}

pub(crate) fn unix_millis(ts: OffsetDateTime) -> i64 {
    (ts.unix_timestamp_nanos() / 1_000_000) as i64
}
