use chrono::{DateTime, Duration, Utc};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Absolute expiry for a token endpoint `expires_in` value; `None` when it does not fit a timestamp.
pub fn expires_at_from_now(expires_in_seconds: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in_seconds).and_then(|ttl| Utc::now().checked_add_signed(ttl))
}
