//! Interactive mode: one tracker action per input line, like the buttons of
//! a small tracker window. Errors are reported and the loop keeps going.

use crate::cli::commands::{send, track};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::identity::IdentityLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, header};
use crate::utils::time::{parse_timestamp, resolve_now};
use chrono::NaiveDateTime;
use std::io::{self, BufRead, Write};

#[derive(Debug, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Exit,
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;
    let identity = IdentityLogic::ensure(&mut pool, cfg)?;

    header(format!(
        "lilotracker: {} ({}, {})",
        identity.name, identity.user_id, identity.work_mode
    ));
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match run_line(&mut pool, cfg, cli.at.as_ref(), line.trim()) {
            Ok(ShellFlow::Continue) => {}
            Ok(ShellFlow::Exit) => break,
            Err(e) => error(e),
        }
    }

    Ok(())
}

/// Execute one shell line.
///
/// Tracker commands accept an optional trailing timestamp
/// (`login 2024-01-01 09:00:00`); `send` accepts the recipient.
pub fn run_line(
    pool: &mut DbPool,
    cfg: &Config,
    at: Option<&String>,
    line: &str,
) -> AppResult<ShellFlow> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let when = || -> AppResult<NaiveDateTime> {
        if rest.is_empty() {
            resolve_now(at)
        } else {
            parse_timestamp(rest).ok_or_else(|| AppError::InvalidDateTime(rest.to_string()))
        }
    };

    match word.to_lowercase().as_str() {
        "" => {}
        "login" => track::login(pool, cfg, when()?)?,
        "break" | "break-start" => track::break_start(pool, when()?)?,
        "resume" | "break-end" => track::break_end(pool, when()?)?,
        "logout" => track::logout(pool, cfg, when()?)?,
        "status" => track::status(pool, when()?)?,
        "send" => send::send_log(pool, cfg, Some(rest).filter(|r| !r.is_empty()))?,
        "help" | "?" => print_help(),
        "exit" | "quit" => return Ok(ShellFlow::Exit),
        other => {
            return Err(AppError::Other(format!(
                "unknown command '{other}' (type 'help')"
            )));
        }
    }

    Ok(ShellFlow::Continue)
}

fn print_help() {
    println!("Commands: login | break | resume | logout | status | send [email] | help | exit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::identity::load_identity;
    use crate::db::queries::load_log_records;
    use crate::models::work_mode::WorkMode;
    use std::env;
    use std::fs;

    fn setup(name: &str) -> (DbPool, Config) {
        let mut pool = DbPool::in_memory().unwrap();
        let path = env::temp_dir().join(format!("{name}_tracker_log.xlsx"));
        fs::remove_file(&path).ok();
        let cfg = Config {
            log_file: path.to_string_lossy().to_string(),
            ..Config::default()
        };
        IdentityLogic::register(&mut pool, &cfg, Some("Ada"), Some("U-42"), Some(WorkMode::Wfo))
            .unwrap();
        (pool, cfg)
    }

    #[test]
    fn a_day_typed_into_the_shell() {
        let (mut pool, cfg) = setup("lilotracker_unit_shell_day");

        for line in [
            "login 2024-01-01 09:00:00",
            "break 2024-01-01 09:30:00",
            "resume 2024-01-01 09:45:00",
            "status 2024-01-01 12:00:00",
            "logout 2024-01-01 17:00:00",
        ] {
            assert_eq!(run_line(&mut pool, &cfg, None, line).unwrap(), ShellFlow::Continue);
        }

        let rows = load_log_records(&pool.conn, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_working_hours, "07:45:00");
    }

    #[test]
    fn errors_do_not_end_the_loop() {
        let (mut pool, cfg) = setup("lilotracker_unit_shell_errors");

        assert!(matches!(
            run_line(&mut pool, &cfg, None, "resume 2024-01-01 09:00:00"),
            Err(AppError::NoOpenBreak)
        ));
        assert!(matches!(
            run_line(&mut pool, &cfg, None, "logout 2024-01-01 17:00:00"),
            Err(AppError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            run_line(&mut pool, &cfg, None, "login yesterday"),
            Err(AppError::InvalidDateTime(_))
        ));
        assert!(run_line(&mut pool, &cfg, None, "dance").is_err());

        assert_eq!(run_line(&mut pool, &cfg, None, "").unwrap(), ShellFlow::Continue);
        assert_eq!(run_line(&mut pool, &cfg, None, "EXIT").unwrap(), ShellFlow::Exit);
    }

    #[test]
    fn logout_without_login_does_not_ask_who_you_are() {
        let mut pool = DbPool::in_memory().unwrap();
        let cfg = Config::default();

        assert!(matches!(
            run_line(&mut pool, &cfg, None, "logout 2024-01-01 17:00:00"),
            Err(AppError::InvalidTimeRange(_))
        ));
        assert!(load_identity(&pool.conn).unwrap().is_none());
    }
}
