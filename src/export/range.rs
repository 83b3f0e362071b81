// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

/// Parse a `--range` / `--period` expression into inclusive date bounds.
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let (start, end) = match r.split_once(':') {
        Some((s, e)) => {
            let (s, e) = (s.trim(), e.trim());
            if s.len() != e.len() {
                return Err(invalid(r, "start and end must have the same format"));
            }
            (period_bounds(s)?.0, period_bounds(e)?.1)
        }
        None => period_bounds(r.trim())?,
    };

    if start > end {
        return Err(invalid(r, "start is after end"));
    }

    Ok((start, end))
}

/// First and last day covered by a single YYYY / YYYY-MM / YYYY-MM-DD value.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid(p, "invalid year"))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(p, "invalid year"))?;
            let last = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(p, "invalid year"))?;
            Ok((first, last))
        }
        // YYYY-MM
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| invalid(p, "invalid month"))?;
            Ok((first, last_day_of_month(first)))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| invalid(p, "invalid date"))?;
            Ok((d, d))
        }
        _ => Err(invalid(p, "unsupported range format")),
    }
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(first)
}

fn invalid(input: &str, why: &str) -> AppError {
    AppError::InvalidDateTime(format!("{input}: {why}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_periods() {
        assert_eq!(parse_range("2024").unwrap(), (d(2024, 1, 1), d(2024, 12, 31)));
        assert_eq!(parse_range("2024-02").unwrap(), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(parse_range("2023-12").unwrap(), (d(2023, 12, 1), d(2023, 12, 31)));
        assert_eq!(parse_range("2024-01-15").unwrap(), (d(2024, 1, 15), d(2024, 1, 15)));
    }

    #[test]
    fn ranges() {
        assert_eq!(parse_range("2023:2024").unwrap(), (d(2023, 1, 1), d(2024, 12, 31)));
        assert_eq!(
            parse_range("2024-06:2024-08").unwrap(),
            (d(2024, 6, 1), d(2024, 8, 31))
        );
        assert_eq!(
            parse_range("2024-06-01:2024-06-10").unwrap(),
            (d(2024, 6, 1), d(2024, 6, 10))
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_range("2024-1").is_err());
        assert!(parse_range("2024:2024-05").is_err());
        assert!(parse_range("2024-13").is_err());
        assert!(parse_range("2025:2024").is_err());
        assert!(parse_range("abcd").is_err());
    }
}
