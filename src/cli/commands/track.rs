//! Session commands: login, break-start, break-end, logout, status.
//!
//! Each function only marshals input into `TrackerLogic` and renders the
//! outcome; the clap dispatcher and the interactive shell share them.

use crate::config::Config;
use crate::core::identity::IdentityLogic;
use crate::core::session::{Session, SessionState};
use crate::core::tracker::TrackerLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_state, colorize_optional};
use crate::utils::time::{format_duration, format_timestamp};
use chrono::NaiveDateTime;

pub fn login(pool: &mut DbPool, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    let identity = IdentityLogic::ensure(pool, cfg)?;
    let (_, previous) = TrackerLogic::login(pool, &identity, now)?;

    if let Some(prev) = previous {
        warning(format!(
            "Login time {} replaced by {}.",
            format_timestamp(&prev),
            format_timestamp(&now)
        ));
    }
    success(format!(
        "Logged in at {}. Welcome {} ({})",
        format_timestamp(&now),
        identity.name,
        identity.work_mode
    ));
    Ok(())
}

pub fn break_start(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<()> {
    let session = TrackerLogic::break_start(pool, now)?;

    if session.login().is_none() {
        warning("Break recorded before any login.");
    }
    success(format!("Break started at {}", format_timestamp(&now)));
    Ok(())
}

pub fn break_end(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<()> {
    let (_, length) = TrackerLogic::break_end(pool, now)?;
    success(format!(
        "Break ended at {} ({})",
        format_timestamp(&now),
        format_duration(length)
    ));
    Ok(())
}

pub fn logout(pool: &mut DbPool, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    // identity may be prompted for: only once the logout is known to be valid
    let before = TrackerLogic::check_logout(pool, now)?;
    let identity = IdentityLogic::ensure(pool, cfg)?;
    let record = TrackerLogic::logout(pool, cfg, &identity, now)?;

    if before.state() == SessionState::OnBreak {
        info("The open break was closed at logout.");
    }
    success(format!(
        "Logged out at {}. Total working hours: {}",
        record.logout_time, record.total_working_hours
    ));
    info(format!("Log updated: {}", cfg.log_file_path().display()));
    Ok(())
}

pub fn status(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<()> {
    let session = TrackerLogic::status(pool)?;
    print_status(&session, now);
    Ok(())
}

fn print_status(session: &Session, now: NaiveDateTime) {
    let state = session.state();

    println!("State   : {}{}{}", color_for_state(state), state, RESET);
    println!(
        "Login   : {}",
        colorize_optional(session.login().map(|t| format_timestamp(&t)))
    );

    for (i, b) in session.breaks().iter().enumerate() {
        let len = b
            .duration()
            .map(format_duration)
            .unwrap_or_else(|| "in progress".to_string());
        println!("Break {:<2}: {} ({})", i + 1, b.to_field(), len);
    }

    if session.login().is_some() {
        println!("Breaks  : {}", format_duration(session.break_duration_at(now)));
    }
    println!(
        "Worked  : {}",
        colorize_optional(session.worked_so_far(now).map(format_duration))
    );
}
