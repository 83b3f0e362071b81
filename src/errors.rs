//! Unified application error type.
//! Every layer (core, db, cli, notify, export) returns AppError so that the
//! CLI and the interactive shell can report any failure the same way.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Session tracking
    // ---------------------------
    #[error("No break in progress")]
    NoOpenBreak,

    #[error("A break is already in progress (started at {0})")]
    BreakAlreadyOpen(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    // ---------------------------
    // IO / persistence
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    // ---------------------------
    // Notification
    // ---------------------------
    #[error("Notification failure: {0}")]
    Notification(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date/time format: {0}")]
    InvalidDateTime(String),

    #[error("Invalid work mode: {0}")]
    InvalidWorkMode(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
