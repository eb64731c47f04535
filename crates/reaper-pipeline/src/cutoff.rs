/// One year of inactivity, in epoch milliseconds.
pub const INACTIVITY_WINDOW_MS: i64 = 365 * 24 * 60 * 60 * 1_000;

/// Returns the current Unix timestamp in milliseconds.
pub fn current_unix_timestamp_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .try_into()
        .unwrap_or(i64::MAX)
}

/// The instant one inactivity window before `now_ms`. Channel age and post
/// recency are both judged against this cutoff.
pub fn archive_cutoff_ms(now_ms: i64) -> i64 {
    now_ms.saturating_sub(INACTIVITY_WINDOW_MS)
}
