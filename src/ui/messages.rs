//! User-facing console messages.
//!
//! Errors go to stderr, everything else to stdout. Warnings never abort the
//! operation that emits them.

use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const FG_BLUE: &str = "\x1b[34m";

#[derive(Clone, Copy)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    /// (colour, icon)
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Level::Info => (FG_BLUE, "ℹ️"),
            Level::Success => ("\x1b[32m", "✅"),
            Level::Warning => ("\x1b[33m", "⚠️"),
            Level::Error => ("\x1b[31m", "❌"),
        }
    }
}

fn emit(level: Level, msg: &dyn fmt::Display) {
    let (colour, icon) = level.style();
    let line = format!("{colour}{BOLD}{icon}{RESET} {msg}");

    match level {
        Level::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    emit(Level::Info, &msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    emit(Level::Success, &msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    emit(Level::Warning, &msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    emit(Level::Error, &msg);
}

/// Section title, used by the interactive shell.
pub fn header<T: fmt::Display>(msg: T) {
    println!("{FG_BLUE}{BOLD}== {msg} =={RESET}");
}
