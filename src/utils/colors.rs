/// ANSI color helper utilities for terminal output.
use crate::core::session::SessionState;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Login → green, break → yellow, logout → red, nothing yet → grey.
pub fn color_for_state(state: SessionState) -> &'static str {
    match state {
        SessionState::NotStarted => GREY,
        SessionState::LoggedIn => GREEN,
        SessionState::OnBreak => YELLOW,
        SessionState::LoggedOut => RED,
    }
}

/// Grey placeholder for values that are not set yet.
pub fn colorize_optional(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => format!("{GREY}--{RESET}"),
    }
}
