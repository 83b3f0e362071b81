use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let rows = ExportLogic::export(&mut pool, *format, file, range.as_deref(), *force)?;

    if rows > 0 {
        let scope = range.as_deref().unwrap_or("all");
        info(format!("{rows} session(s) exported ({scope})."));
    }

    Ok(())
}
