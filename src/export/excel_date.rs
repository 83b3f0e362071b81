// src/export/excel_date.rs

use chrono::{NaiveDate, NaiveDateTime};

/// Interpret a log cell as a date or timestamp, returning the Excel serial
/// and the number format to display it with.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(("yyyy-mm-dd hh:mm:ss", naive_datetime_to_excel_serial(&dt)));
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let dt = d.and_hms_opt(0, 0, 0)?;
        return Some(("yyyy-mm-dd", naive_datetime_to_excel_serial(&dt)));
    }

    None
}

/// Interpret `HH:MM:SS` (hours unbounded) as an Excel duration.
pub(crate) fn parse_to_excel_duration(s: &str) -> Option<(&'static str, f64)> {
    if s.starts_with('-') {
        return None;
    }

    let mut parts = s.split(':');
    let h: i64 = parts.next()?.parse().ok()?;
    let m: i64 = parts.next()?.parse().ok()?;
    let sec: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(0..60).contains(&m) || !(0..60).contains(&sec) {
        return None;
    }

    let total = h * 3600 + m * 60 + sec;
    Some(("[h]:mm:ss", total as f64 / 86400.0))
}

fn naive_datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    let duration = *dt - excel_epoch;

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    days + secs / 86400.0
}
