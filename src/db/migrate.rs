use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Every other migration records itself
/// there, so it is always created first.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

/// Versioned schema steps, applied in order and at most once.
///
/// (version, description, sql)
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_user_info",
        "Created user_info key/value table",
        r#"
        CREATE TABLE IF NOT EXISTS user_info (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    ),
    (
        "20250301_0002_active_session",
        "Created active_session table",
        r#"
        CREATE TABLE IF NOT EXISTS active_session (
            id         INTEGER PRIMARY KEY CHECK (id = 1),
            state      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "20250301_0003_tracker_log",
        "Created tracker_log table",
        r#"
        CREATE TABLE IF NOT EXISTS tracker_log (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            date          TEXT NOT NULL,
            username      TEXT NOT NULL,
            user_id       TEXT NOT NULL,
            work_mode     TEXT NOT NULL,
            login_time    TEXT NOT NULL,
            break_times   TEXT NOT NULL DEFAULT '',
            logout_time   TEXT NOT NULL,
            total_working TEXT NOT NULL
        );
        "#,
    ),
    (
        "20250412_0004_tracker_log_date_index",
        "Added date index to tracker_log",
        "CREATE INDEX IF NOT EXISTS idx_tracker_log_date ON tracker_log(date);",
    ),
    (
        "20250520_0005_log_files",
        "Created log_files table (last workbook written per path)",
        r#"
        CREATE TABLE IF NOT EXISTS log_files (
            path       TEXT PRIMARY KEY,
            content    BLOB NOT NULL,
            written_at TEXT NOT NULL
        );
        "#,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> Result<()> {
    conn.execute_batch(sql)?;
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked every time a `DbPool` is opened.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, description, sql) in MIGRATIONS {
        if !is_applied(conn, version)? {
            apply(conn, version, description, sql)?;
        }
    }

    Ok(())
}

/// Number of migrations recorded as applied.
pub fn applied_count(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
        [],
        |row| row.get(0),
    )
}
