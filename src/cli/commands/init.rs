use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::tracker::TrackerLogic;
use crate::db::log::ttlog_soft;
use crate::db::migrate::applied_count;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database and its migrations
///  - the spreadsheet log, with only the header row if it is new
pub fn handle(cli: &Cli) -> AppResult<()> {
    let mut cfg = Config::init_all(cli.db.clone(), cli.test)?;
    if let Some(log_file) = &cli.log_file {
        cfg.log_file = log_file.clone();
    }

    println!("⚙️  Initializing lilotracker…");
    println!("🗄️  Database   : {}", &cfg.database);

    let mut pool = DbPool::new(&cfg.database)?;
    println!("✅ Database initialized ({} migrations applied)", applied_count(&pool.conn)?);

    let log_path = cfg.log_file_path();
    if TrackerLogic::ensure_log_file(&mut pool, &cfg)? {
        println!("📊 Log file   : {} (created)", log_path.display());
    } else {
        println!("📊 Log file   : {} (already present)", log_path.display());
    }

    ttlog_soft(
        &pool.conn,
        "init",
        "",
        &format!("Database initialized at {}", &cfg.database),
    );

    println!("🎉 lilotracker initialization completed!");
    Ok(())
}
