use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::models::log_record::LogRecord;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

// ---------------------------------------------------------------
// Active session
// ---------------------------------------------------------------

/// Load the session in progress, or a fresh one if none is stored.
pub fn load_active_session(conn: &Connection) -> AppResult<Session> {
    let raw: Option<String> = conn
        .query_row("SELECT state FROM active_session WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        None => Ok(Session::new()),
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| AppError::Persistence(format!("stored session is unreadable: {e}"))),
    }
}

pub fn save_active_session(conn: &Connection, session: &Session) -> AppResult<()> {
    let json = serde_json::to_string(session)
        .map_err(|e| AppError::Persistence(format!("cannot serialize session: {e}")))?;

    conn.execute(
        "INSERT INTO active_session (id, state, updated_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
        params![json, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn clear_active_session(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM active_session", [])?;
    Ok(())
}

// ---------------------------------------------------------------
// Tracker log
// ---------------------------------------------------------------

pub fn insert_log_record(conn: &Connection, rec: &LogRecord) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO tracker_log
            (date, username, user_id, work_mode, login_time, break_times, logout_time, total_working)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    stmt.execute(params![
        rec.date,
        rec.username,
        rec.user_id,
        rec.work_mode,
        rec.login_time,
        rec.break_times,
        rec.logout_time,
        rec.total_working_hours,
    ])?;

    Ok(conn.last_insert_rowid())
}

fn map_record(row: &Row) -> rusqlite::Result<LogRecord> {
    Ok(LogRecord {
        date: row.get("date")?,
        username: row.get("username")?,
        user_id: row.get("user_id")?,
        work_mode: row.get("work_mode")?,
        login_time: row.get("login_time")?,
        break_times: row.get("break_times")?,
        logout_time: row.get("logout_time")?,
        total_working_hours: row.get("total_working")?,
    })
}

/// Load log rows in insertion order, optionally limited to a date range
/// (inclusive on both ends).
pub fn load_log_records(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<LogRecord>> {
    let mut out = Vec::new();

    match bounds {
        None => {
            let mut stmt = conn.prepare("SELECT * FROM tracker_log ORDER BY id ASC")?;
            for r in stmt.query_map([], map_record)? {
                out.push(r?);
            }
        }
        Some((start, end)) => {
            let mut stmt = conn.prepare(
                "SELECT * FROM tracker_log
                 WHERE date >= ?1 AND date <= ?2
                 ORDER BY id ASC",
            )?;
            let s = start.format("%Y-%m-%d").to_string();
            let e = end.format("%Y-%m-%d").to_string();
            for r in stmt.query_map(params![s, e], map_record)? {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

// ---------------------------------------------------------------
// Log workbooks written by this database
// ---------------------------------------------------------------

/// Bytes of the last workbook this database wrote to `path`.
pub fn load_log_file_content(conn: &Connection, path: &str) -> AppResult<Option<Vec<u8>>> {
    let content = conn
        .query_row(
            "SELECT content FROM log_files WHERE path = ?1",
            [path],
            |row| row.get(0),
        )
        .optional()?;
    Ok(content)
}

pub fn save_log_file_content(conn: &Connection, path: &str, content: &[u8]) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log_files (path, content, written_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(path) DO UPDATE SET content = excluded.content, written_at = excluded.written_at",
        params![path, content, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::utils::time::parse_timestamp;

    fn record(date: &str) -> LogRecord {
        LogRecord {
            date: date.into(),
            username: "Ada".into(),
            user_id: "U-42".into(),
            work_mode: "WFO".into(),
            login_time: format!("{date} 09:00:00"),
            break_times: String::new(),
            logout_time: format!("{date} 17:00:00"),
            total_working_hours: "08:00:00".into(),
        }
    }

    #[test]
    fn active_session_survives_reload() {
        let pool = DbPool::in_memory().unwrap();
        assert_eq!(load_active_session(&pool.conn).unwrap(), Session::new());

        let mut s = Session::new();
        s.start_at(parse_timestamp("2024-01-01 09:00:00").unwrap());
        s.begin_break_at(parse_timestamp("2024-01-01 10:00:00").unwrap())
            .unwrap();
        save_active_session(&pool.conn, &s).unwrap();
        save_active_session(&pool.conn, &s).unwrap();

        assert_eq!(load_active_session(&pool.conn).unwrap(), s);

        clear_active_session(&pool.conn).unwrap();
        assert_eq!(load_active_session(&pool.conn).unwrap(), Session::new());
    }

    #[test]
    fn corrupt_session_is_a_persistence_failure() {
        let pool = DbPool::in_memory().unwrap();
        pool.conn
            .execute(
                "INSERT INTO active_session (id, state, updated_at) VALUES (1, 'nope', 'x')",
                [],
            )
            .unwrap();

        assert!(matches!(
            load_active_session(&pool.conn),
            Err(AppError::Persistence(_))
        ));
    }

    #[test]
    fn records_filter_by_date() {
        let pool = DbPool::in_memory().unwrap();
        for d in ["2024-01-31", "2024-02-01", "2024-02-29", "2024-03-01"] {
            insert_log_record(&pool.conn, &record(d)).unwrap();
        }

        let all = load_log_records(&pool.conn, None).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], record("2024-01-31"));

        let feb = load_log_records(
            &pool.conn,
            Some((
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            )),
        )
        .unwrap();
        let dates: Vec<&str> = feb.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-02-29"]);
    }

    #[test]
    fn log_file_content_is_replaced_per_path() {
        let pool = DbPool::in_memory().unwrap();
        assert!(load_log_file_content(&pool.conn, "/tmp/a.xlsx").unwrap().is_none());

        save_log_file_content(&pool.conn, "/tmp/a.xlsx", b"one").unwrap();
        save_log_file_content(&pool.conn, "/tmp/a.xlsx", b"two").unwrap();
        save_log_file_content(&pool.conn, "/tmp/b.xlsx", b"other").unwrap();

        assert_eq!(
            load_log_file_content(&pool.conn, "/tmp/a.xlsx").unwrap(),
            Some(b"two".to_vec())
        );
    }
}
