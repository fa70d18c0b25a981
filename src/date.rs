use chrono::{DateTime, Duration, Local, Timelike};

/// Shifts a timestamp by whole minutes.
pub fn add_minutes(t: DateTime<Local>, minutes: i64) -> DateTime<Local> {
    t + Duration::minutes(minutes)
}

/// Zeroes minutes, seconds and sub-seconds, keeping the hour.
///
/// The form prefill and the voice parser both snap start times to the hour.
pub fn truncate_to_hour(t: DateTime<Local>) -> DateTime<Local> {
    t.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Midnight at the start of the day after `now`.
pub fn start_of_tomorrow(now: DateTime<Local>) -> DateTime<Local> {
    let midnight = now
        .with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    midnight + Duration::days(1)
}
