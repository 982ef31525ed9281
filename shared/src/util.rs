/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC timestamp as RFC 3339 string (status-history entries,
/// audit-style fields that older readers expect as strings).
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
