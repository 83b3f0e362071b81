//! Session tracker: login / break / logout bookkeeping for one work session.
//!
//! A `Session` is a plain owned value. Every operation takes the instant it
//! happens at, so the same code runs against the real clock (CLI) and
//! against fixed instants (tests, `--at`).

use crate::errors::{AppError, AppResult};
use crate::utils::time::{format_timestamp, now};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One break interval. `end` is `None` while the break is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl Break {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }

    /// Part of the break that falls inside `[lo, hi]`; zero for open breaks.
    fn clamped_duration(&self, lo: NaiveDateTime, hi: NaiveDateTime) -> Duration {
        match self.end {
            Some(end) => positive_span(self.start.max(lo), end.min(hi)),
            None => Duration::zero(),
        }
    }

    /// `"<start> - <end>"`, the textual form stored in the log.
    pub fn to_field(&self) -> String {
        match self.end {
            Some(end) => format!("{} - {}", format_timestamp(&self.start), format_timestamp(&end)),
            None => format!("{} - ", format_timestamp(&self.start)),
        }
    }
}

fn positive_span(from: NaiveDateTime, to: NaiveDateTime) -> Duration {
    if to > from { to - from } else { Duration::zero() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    LoggedIn,
    OnBreak,
    LoggedOut,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not started",
            SessionState::LoggedIn => "logged in",
            SessionState::OnBreak => "on break",
            SessionState::LoggedOut => "logged out",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    login: Option<NaiveDateTime>,
    logout: Option<NaiveDateTime>,
    #[serde(default)]
    breaks: Vec<Break>,
    #[serde(default)]
    total_seconds: Option<i64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self) -> Option<NaiveDateTime> {
        self.login
    }

    pub fn logout(&self) -> Option<NaiveDateTime> {
        self.logout
    }

    pub fn breaks(&self) -> &[Break] {
        &self.breaks
    }

    pub fn open_break(&self) -> Option<&Break> {
        self.breaks.last().filter(|b| b.is_open())
    }

    pub fn state(&self) -> SessionState {
        if self.logout.is_some() {
            SessionState::LoggedOut
        } else if self.login.is_none() {
            SessionState::NotStarted
        } else if self.open_break().is_some() {
            SessionState::OnBreak
        } else {
            SessionState::LoggedIn
        }
    }

    /// Record the login instant. A second call overwrites the first one;
    /// the previous value is returned so the caller can report it.
    ///
    /// Starting an ended session begins a new one: breaks, logout and total
    /// of the old session are discarded.
    pub fn start_at(&mut self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.logout.is_some() {
            *self = Session::new();
        }
        self.login.replace(now)
    }

    /// Open a new break at `now`.
    ///
    /// Rejected while another break is open, after logout, or when `now`
    /// precedes the login or the end of the previous break.
    pub fn begin_break_at(&mut self, now: NaiveDateTime) -> AppResult<()> {
        if let Some(open) = self.open_break() {
            return Err(AppError::BreakAlreadyOpen(format_timestamp(&open.start)));
        }
        if self.logout.is_some() {
            return Err(AppError::InvalidTimeRange(
                "the session has already ended".into(),
            ));
        }
        if let Some(login) = self.login
            && now < login
        {
            return Err(AppError::InvalidTimeRange(format!(
                "break start {} is before login {}",
                format_timestamp(&now),
                format_timestamp(&login)
            )));
        }
        if let Some(prev_end) = self.breaks.last().and_then(|b| b.end)
            && now < prev_end
        {
            return Err(AppError::InvalidTimeRange(format!(
                "break start {} is before the end of the previous break {}",
                format_timestamp(&now),
                format_timestamp(&prev_end)
            )));
        }

        self.breaks.push(Break {
            start: now,
            end: None,
        });
        Ok(())
    }

    /// Close the open break at `now` and return its duration.
    pub fn end_break_at(&mut self, now: NaiveDateTime) -> AppResult<Duration> {
        match self.breaks.last_mut() {
            Some(b) if b.is_open() => {
                if now < b.start {
                    return Err(AppError::InvalidTimeRange(format!(
                        "break end {} is before break start {}",
                        format_timestamp(&now),
                        format_timestamp(&b.start)
                    )));
                }
                b.end = Some(now);
                Ok(now - b.start)
            }
            _ => Err(AppError::NoOpenBreak),
        }
    }

    /// Record the logout instant and compute the total working duration.
    ///
    /// An open break is closed at `now` first. On error nothing is mutated.
    pub fn end_at(&mut self, now: NaiveDateTime) -> AppResult<Duration> {
        let login = self.login.ok_or_else(|| {
            AppError::InvalidTimeRange("logout requested without a prior login".into())
        })?;

        if now <= login {
            return Err(AppError::InvalidTimeRange(format!(
                "logout {} is not after login {}",
                format_timestamp(&now),
                format_timestamp(&login)
            )));
        }

        if let Some(open) = self.open_break()
            && now < open.start
        {
            return Err(AppError::InvalidTimeRange(format!(
                "logout {} is before the start of the open break {}",
                format_timestamp(&now),
                format_timestamp(&open.start)
            )));
        }

        if let Some(b) = self.breaks.last_mut()
            && b.is_open()
        {
            b.end = Some(now);
        }

        self.logout = Some(now);
        let total = (now - login) - self.closed_breaks_within(login, now);
        self.total_seconds = Some(total.num_seconds());

        Ok(total)
    }

    // Wall-clock variants of the `*_at` operations.

    pub fn start(&mut self) -> Option<NaiveDateTime> {
        self.start_at(now())
    }

    pub fn begin_break(&mut self) -> AppResult<()> {
        self.begin_break_at(now())
    }

    pub fn end_break(&mut self) -> AppResult<Duration> {
        self.end_break_at(now())
    }

    pub fn end(&mut self) -> AppResult<Duration> {
        self.end_at(now())
    }

    /// Total working duration, available once `end_at` has succeeded.
    pub fn total_working_duration(&self) -> Option<Duration> {
        self.total_seconds.map(Duration::seconds)
    }

    /// Break time inside the session at `now`: closed breaks plus the
    /// elapsed part of an open one, all clamped to `[login, logout or now]`.
    /// Zero before login.
    pub fn break_duration_at(&self, now: NaiveDateTime) -> Duration {
        let Some(login) = self.login else {
            return Duration::zero();
        };
        let hi = self.logout.unwrap_or(now);

        let open = self
            .open_break()
            .map(|b| positive_span(b.start.max(login), hi))
            .unwrap_or_else(Duration::zero);

        self.closed_breaks_within(login, hi) + open
    }

    /// Running working time at `now`: the final total once logged out,
    /// otherwise elapsed time minus `break_duration_at(now)`.
    pub fn worked_so_far(&self, now: NaiveDateTime) -> Option<Duration> {
        if let Some(total) = self.total_working_duration() {
            return Some(total);
        }

        let login = self.login?;
        Some(positive_span(login, now) - self.break_duration_at(now))
    }

    /// Breaks joined into the single "Each Break Time" field.
    pub fn breaks_field(&self, separator: &str) -> String {
        self.breaks
            .iter()
            .map(Break::to_field)
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn closed_breaks_within(&self, lo: NaiveDateTime, hi: NaiveDateTime) -> Duration {
        self.breaks
            .iter()
            .map(|b| b.clamped_duration(lo, hi))
            .fold(Duration::zero(), |acc, d| acc + d)
    }
}
