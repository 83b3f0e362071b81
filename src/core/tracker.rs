use crate::config::Config;
use crate::core::log_file::LogFile;
use crate::core::session::Session;
use crate::db::log::{ttlog, ttlog_soft};
use crate::db::pool::DbPool;
use crate::db::queries::{
    clear_active_session, insert_log_record, load_active_session, load_log_records,
    save_active_session,
};
use crate::errors::AppResult;
use crate::export::xlsx::stage_log_workbook;
use crate::models::identity::Identity;
use crate::models::log_record::LogRecord;
use crate::ui::messages::warning;
use crate::utils::time::{format_duration, format_timestamp};
use chrono::{Duration, NaiveDateTime};

/// Loads the active session, applies one tracker operation and stores the
/// result. A failed operation never touches the stored session.
pub struct TrackerLogic;

impl TrackerLogic {
    /// Record the login instant. Returns the updated session and the login
    /// it replaced, if any.
    pub fn login(
        pool: &mut DbPool,
        identity: &Identity,
        now: NaiveDateTime,
    ) -> AppResult<(Session, Option<NaiveDateTime>)> {
        let mut session = load_active_session(&pool.conn)?;
        let previous = session.start_at(now);
        save_active_session(&pool.conn, &session)?;

        ttlog_soft(
            &pool.conn,
            "login",
            &identity.user_id,
            &format!("Logged in at {}", format_timestamp(&now)),
        );

        Ok((session, previous))
    }

    pub fn break_start(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<Session> {
        let mut session = load_active_session(&pool.conn)?;
        session.begin_break_at(now)?;
        save_active_session(&pool.conn, &session)?;

        ttlog_soft(
            &pool.conn,
            "break_start",
            "",
            &format!("Break started at {}", format_timestamp(&now)),
        );

        Ok(session)
    }

    /// Close the open break; returns the session and the break's duration.
    pub fn break_end(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<(Session, Duration)> {
        let mut session = load_active_session(&pool.conn)?;
        let length = session.end_break_at(now)?;
        save_active_session(&pool.conn, &session)?;

        ttlog_soft(
            &pool.conn,
            "break_end",
            "",
            &format!(
                "Break ended at {} ({})",
                format_timestamp(&now),
                format_duration(length)
            ),
        );

        Ok((session, length))
    }

    /// Check that a logout at `now` would succeed, without changing
    /// anything. Lets callers fail before asking for missing details.
    pub fn check_logout(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<Session> {
        let session = load_active_session(&pool.conn)?;
        session.clone().end_at(now)?;
        Ok(session)
    }

    /// End the session and append its row to the tracker log.
    ///
    /// The row insert, the removal of the active session and the audit line
    /// share one transaction. The spreadsheet is rendered to a partial file
    /// first and only moved into place once the transaction has committed,
    /// so a failure at any step leaves both the session and the file as
    /// they were. If the final rename fails the row is already stored and
    /// the next logout re-renders it.
    pub fn logout(
        pool: &mut DbPool,
        cfg: &Config,
        identity: &Identity,
        now: NaiveDateTime,
    ) -> AppResult<LogRecord> {
        let mut session = load_active_session(&pool.conn)?;
        session.end_at(now)?;

        let record = LogRecord::from_session(&session, identity, &cfg.break_separator)?;
        let log_path = cfg.log_file_path();

        let tx = pool.conn.transaction()?;
        insert_log_record(&tx, &record)?;
        clear_active_session(&tx)?;
        ttlog(
            &tx,
            "logout",
            &identity.user_id,
            &format!(
                "Logged out at {} (worked {})",
                record.logout_time, record.total_working_hours
            ),
        )?;

        let all = load_log_records(&tx, None)?;
        let staged = stage_log_workbook(&all, &log_path)?;
        let backup = LogFile::adopt(&tx, &log_path, staged.partial_path())?;

        tx.commit()?;
        staged.publish()?;

        if let Some(b) = backup {
            warning(format!(
                "{} was not written by this database; its previous content was kept in {}",
                log_path.display(),
                b.display()
            ));
        }

        Ok(record)
    }

    pub fn status(pool: &mut DbPool) -> AppResult<Session> {
        load_active_session(&pool.conn)
    }

    /// Make sure the spreadsheet exists; creates it with the rows already
    /// stored (possibly only the header). An existing file is left alone.
    pub fn ensure_log_file(pool: &mut DbPool, cfg: &Config) -> AppResult<bool> {
        let path = cfg.log_file_path();
        if path.exists() {
            return Ok(false);
        }
        let all = load_log_records(&pool.conn, None)?;
        let staged = stage_log_workbook(&all, &path)?;
        LogFile::adopt(&pool.conn, &path, staged.partial_path())?;
        staged.publish()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionState;
    use crate::errors::AppError;
    use crate::models::work_mode::WorkMode;
    use crate::utils::time::parse_timestamp;
    use std::env;
    use std::fs;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(&format!("2024-01-01 {s}")).unwrap()
    }

    fn cfg_with_log(name: &str) -> Config {
        let path = env::temp_dir().join(format!("{name}_tracker_log.xlsx"));
        fs::remove_file(&path).ok();
        Config {
            log_file: path.to_string_lossy().to_string(),
            ..Config::default()
        }
    }

    fn ada() -> Identity {
        Identity::new("Ada", "U-42", WorkMode::Wfo)
    }

    #[test]
    fn full_day_is_logged() {
        let mut pool = DbPool::in_memory().unwrap();
        let cfg = cfg_with_log("lilotracker_unit_full_day");

        TrackerLogic::login(&mut pool, &ada(), ts("09:00:00")).unwrap();
        TrackerLogic::break_start(&mut pool, ts("09:30:00")).unwrap();
        let (_, len) = TrackerLogic::break_end(&mut pool, ts("09:45:00")).unwrap();
        assert_eq!(len, Duration::minutes(15));

        let rec = TrackerLogic::logout(&mut pool, &cfg, &ada(), ts("17:00:00")).unwrap();
        assert_eq!(rec.total_working_hours, "07:45:00");
        assert!(cfg.log_file_path().exists());

        let stored = load_log_records(&pool.conn, None).unwrap();
        assert_eq!(stored, vec![rec]);
        assert_eq!(
            TrackerLogic::status(&mut pool).unwrap().state(),
            SessionState::NotStarted
        );
    }

    #[test]
    fn logout_without_login_appends_nothing() {
        let mut pool = DbPool::in_memory().unwrap();
        let cfg = cfg_with_log("lilotracker_unit_no_login");

        let res = TrackerLogic::logout(&mut pool, &cfg, &ada(), ts("17:00:00"));
        assert!(matches!(res, Err(AppError::InvalidTimeRange(_))));
        assert!(load_log_records(&pool.conn, None).unwrap().is_empty());
        assert!(!cfg.log_file_path().exists());
    }

    #[test]
    fn failed_break_end_keeps_stored_session() {
        let mut pool = DbPool::in_memory().unwrap();
        TrackerLogic::login(&mut pool, &ada(), ts("09:00:00")).unwrap();
        let before = TrackerLogic::status(&mut pool).unwrap();

        assert!(matches!(
            TrackerLogic::break_end(&mut pool, ts("10:00:00")),
            Err(AppError::NoOpenBreak)
        ));
        assert_eq!(TrackerLogic::status(&mut pool).unwrap(), before);
    }

    #[test]
    fn spreadsheet_failure_rolls_back() {
        let mut pool = DbPool::in_memory().unwrap();
        let dir = env::temp_dir().join("lilotracker_unit_rollback_dir.xlsx");
        fs::create_dir_all(&dir).unwrap();
        let cfg = Config {
            log_file: dir.to_string_lossy().to_string(),
            ..Config::default()
        };

        TrackerLogic::login(&mut pool, &ada(), ts("09:00:00")).unwrap();
        let before = TrackerLogic::status(&mut pool).unwrap();

        assert!(TrackerLogic::logout(&mut pool, &cfg, &ada(), ts("17:00:00")).is_err());
        assert!(load_log_records(&pool.conn, None).unwrap().is_empty());
        assert_eq!(TrackerLogic::status(&mut pool).unwrap(), before);
    }

    #[test]
    fn ensure_log_file_creates_header_only_workbook() {
        let mut pool = DbPool::in_memory().unwrap();
        let cfg = cfg_with_log("lilotracker_unit_header_only");

        assert!(TrackerLogic::ensure_log_file(&mut pool, &cfg).unwrap());
        assert!(cfg.log_file_path().exists());
        assert!(!TrackerLogic::ensure_log_file(&mut pool, &cfg).unwrap());
    }

    #[test]
    fn check_logout_changes_nothing() {
        let mut pool = DbPool::in_memory().unwrap();
        assert!(matches!(
            TrackerLogic::check_logout(&mut pool, ts("17:00:00")),
            Err(AppError::InvalidTimeRange(_))
        ));

        TrackerLogic::login(&mut pool, &ada(), ts("09:00:00")).unwrap();
        TrackerLogic::break_start(&mut pool, ts("12:00:00")).unwrap();
        let before = TrackerLogic::status(&mut pool).unwrap();

        let checked = TrackerLogic::check_logout(&mut pool, ts("17:00:00")).unwrap();
        assert_eq!(checked, before);
        assert_eq!(TrackerLogic::status(&mut pool).unwrap().state(), SessionState::OnBreak);
    }

    #[test]
    fn failed_commit_leaves_spreadsheet_untouched() {
        let mut pool = DbPool::in_memory().unwrap();
        let cfg = cfg_with_log("lilotracker_unit_failed_commit");

        // a deferred foreign key violation only surfaces at COMMIT
        pool.conn
            .execute_batch(
                "PRAGMA foreign_keys = ON;
                 CREATE TABLE parent (id INTEGER PRIMARY KEY);
                 CREATE TABLE child (
                     parent_id INTEGER REFERENCES parent(id) DEFERRABLE INITIALLY DEFERRED
                 );
                 CREATE TRIGGER break_commit AFTER INSERT ON tracker_log
                 BEGIN
                     INSERT INTO child (parent_id) VALUES (999);
                 END;",
            )
            .unwrap();

        TrackerLogic::login(&mut pool, &ada(), ts("09:00:00")).unwrap();
        let before = TrackerLogic::status(&mut pool).unwrap();

        assert!(TrackerLogic::logout(&mut pool, &cfg, &ada(), ts("17:00:00")).is_err());

        let log_path = cfg.log_file_path();
        assert!(!log_path.exists());
        assert!(!log_path.with_file_name(format!(
            "{}.partial",
            log_path.file_name().unwrap().to_string_lossy()
        )).exists());
        assert!(load_log_records(&pool.conn, None).unwrap().is_empty());
        assert_eq!(TrackerLogic::status(&mut pool).unwrap(), before);
    }

    #[test]
    fn shared_log_file_is_not_silently_replaced() {
        let dir = env::temp_dir().join("lilotracker_unit_shared_log");
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        let cfg = Config {
            log_file: dir.join("tracker_log.xlsx").to_string_lossy().to_string(),
            ..Config::default()
        };
        let log_path = cfg.log_file_path();
        let day = |d: &str, t: &str| parse_timestamp(&format!("2024-01-0{d} {t}")).unwrap();
        let backups = || {
            fs::read_dir(&dir)
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().ends_with(".bak.xlsx"))
                .map(|e| e.path())
                .collect::<Vec<_>>()
        };

        let mut first = DbPool::in_memory().unwrap();
        TrackerLogic::login(&mut first, &ada(), day("1", "09:00:00")).unwrap();
        TrackerLogic::logout(&mut first, &cfg, &ada(), day("1", "17:00:00")).unwrap();
        let day_one = fs::read(&log_path).unwrap();

        let mut second = DbPool::in_memory().unwrap();
        TrackerLogic::login(&mut second, &ada(), day("2", "09:00:00")).unwrap();
        TrackerLogic::logout(&mut second, &cfg, &ada(), day("2", "17:00:00")).unwrap();

        let kept = backups();
        assert_eq!(kept.len(), 1);
        assert_eq!(fs::read(&kept[0]).unwrap(), day_one);

        // the second database now owns the file: no new backup
        TrackerLogic::login(&mut second, &ada(), day("3", "09:00:00")).unwrap();
        TrackerLogic::logout(&mut second, &cfg, &ada(), day("3", "17:00:00")).unwrap();
        assert_eq!(backups().len(), 1);

        // ...but the first one sees foreign content again
        TrackerLogic::login(&mut first, &ada(), day("4", "09:00:00")).unwrap();
        TrackerLogic::logout(&mut first, &cfg, &ada(), day("4", "17:00:00")).unwrap();
        assert_eq!(backups().len(), 2);
    }
}
