//! Time utilities: timestamp parsing/formatting, clock access, duration formatting.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, Local, NaiveDateTime, Timelike};

/// Textual format of every persisted or displayed instant.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local wall-clock time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

pub fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Resolve the instant an operation runs at: the `--at` override when given,
/// the local clock otherwise.
pub fn resolve_now(at: Option<&String>) -> AppResult<NaiveDateTime> {
    match at {
        Some(s) => parse_timestamp(s).ok_or_else(|| AppError::InvalidDateTime(s.to_string())),
        None => Ok(now()),
    }
}

/// Format a duration as `HH:MM:SS` (hours are not wrapped at 24).
pub fn format_duration(d: Duration) -> String {
    let secs = d.num_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    format!("{}{:02}:{:02}:{:02}", sign, s / 3600, (s % 3600) / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_timestamps() {
        let ts = parse_timestamp("2024-01-01 09:05:07").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-01 09:05:07");
        assert!(parse_timestamp("2024-01-01 09:05").is_none());
        assert!(parse_timestamp("garbage").is_none());
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(Duration::seconds(7 * 3600 + 45 * 60)), "07:45:00");
        assert_eq!(format_duration(Duration::seconds(26 * 3600 + 61)), "26:01:01");
        assert_eq!(format_duration(Duration::seconds(-90)), "-00:01:30");
        assert_eq!(format_duration(Duration::zero()), "00:00:00");
    }

    #[test]
    fn resolve_now_prefers_override() {
        let at = "2024-01-01 17:00:00".to_string();
        let ts = resolve_now(Some(&at)).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-01 17:00:00");

        let bad = "17:00".to_string();
        assert!(matches!(
            resolve_now(Some(&bad)),
            Err(AppError::InvalidDateTime(_))
        ));
    }
}
