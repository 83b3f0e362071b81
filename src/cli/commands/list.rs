use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::load_log_records;
use crate::errors::AppResult;
use crate::export::logic::resolve_bounds;
use crate::models::log_record::LOG_HEADERS;
use crate::ui::messages::info;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let bounds = resolve_bounds(period.as_deref())?;
        let records = load_log_records(&pool.conn, bounds)?;

        if records.is_empty() {
            info("No logged sessions for the selected period.");
            return Ok(());
        }

        let mut table = Table::new(&LOG_HEADERS);
        for rec in &records {
            table.add_row(rec.to_row());
        }
        print!("{}", table.render());
        println!("\n{} session(s)", records.len());
    }

    Ok(())
}
