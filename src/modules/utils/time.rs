use chrono::{DateTime, Local, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Function to format a millisecond timestamp as a readable UTC date
pub fn format_timestamp_millis(timestamp_ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64)
        .unwrap_or_default()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Convert a millisecond timestamp to a local time string
pub fn millis_to_local(timestamp_ms: u64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64) {
        Some(utc_time) => {
            let local_time: DateTime<Local> = DateTime::from(utc_time);
            local_time.format("%Y-%m-%d %H:%M:%S %Z").to_string()
        }
        None => String::from("unknown"),
    }
}

/// Format a duration in milliseconds to a human readable string
pub fn format_duration_millis(millis: u64) -> String {
    let seconds = millis / 1000;
    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        format!("{} minutes", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours", seconds / 3600)
    } else {
        format!("{} days", seconds / 86400)
    }
}
