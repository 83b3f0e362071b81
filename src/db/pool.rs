//! SQLite connection wrapper (one connection per CLI invocation).

use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the database, creating the parent directory if needed.
    pub fn new(path: &str) -> AppResult<Self> {
        let p = Path::new(path);
        if let Some(dir) = p.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        Self::with_schema(Connection::open(p)?)
    }

    /// In-memory database with the full schema, used by unit tests.
    pub fn in_memory() -> AppResult<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> AppResult<Self> {
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }
}
