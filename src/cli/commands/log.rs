use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print, last } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        if *print {
            LogLogic::print_log(&mut pool, *last)?;
        } else {
            let count = LogLogic::load(&mut pool)?.len();
            info(format!(
                "{count} audit entries. Use `lilotracker log --print` to show them."
            ));
        }
    }

    Ok(())
}
