//! Ownership of the spreadsheet log.
//!
//! The workbook is re-rendered from `tracker_log` whenever a session ends,
//! which is only safe for a file this database wrote last. Any other
//! content at the target (another database, an older tool, a manual edit)
//! is copied aside before it is replaced.

use crate::db::queries::{load_log_file_content, save_log_file_content};
use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct LogFile;

impl LogFile {
    /// True when `target` is missing or holds exactly what this database
    /// wrote there last.
    pub fn written_by(conn: &Connection, target: &Path) -> AppResult<bool> {
        let current = match fs::read(target) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        let ours = load_log_file_content(conn, &key(target))?;
        Ok(ours.as_deref() == Some(current.as_slice()))
    }

    /// Prepare `target` to be replaced by the workbook at `staged`.
    ///
    /// Foreign content is copied to a backup first; `staged` is then
    /// recorded as this database's copy. Returns the backup path, if any.
    pub fn adopt(conn: &Connection, target: &Path, staged: &Path) -> AppResult<Option<PathBuf>> {
        let backup = if Self::written_by(conn, target)? {
            None
        } else {
            let dest = backup_path(target, Local::now().naive_local());
            fs::copy(target, &dest).map_err(|e| {
                AppError::Persistence(format!(
                    "cannot back up {} to {}: {e}",
                    target.display(),
                    dest.display()
                ))
            })?;
            Some(dest)
        };

        save_log_file_content(conn, &key(target), &fs::read(staged)?)?;
        Ok(backup)
    }
}

fn key(target: &Path) -> String {
    target.to_string_lossy().to_string()
}

/// `tracker_log.xlsx` -> `tracker_log.20240101-170000.bak.xlsx`, with a
/// counter appended when that name is taken.
pub fn backup_path(target: &Path, at: NaiveDateTime) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "tracker_log".to_string());
    let ext = target
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "xlsx".to_string());
    let stamp = at.format("%Y%m%d-%H%M%S");

    let mut candidate = target.with_file_name(format!("{stem}.{stamp}.bak.{ext}"));
    let mut n = 1;
    while candidate.exists() {
        candidate = target.with_file_name(format!("{stem}.{stamp}-{n}.bak.{ext}"));
        n += 1;
    }
    candidate
}
