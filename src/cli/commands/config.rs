use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::info;

/// Handle the `config` subcommand; without flags it only shows where the
/// file lives.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();

    if !*print_config && !*edit_config {
        let state = if path.exists() { "" } else { " (not created yet)" };
        info(format!("Configuration file: {}{}", path.display(), state));
        return Ok(());
    }

    if *print_config {
        ConfigLogic::print(cfg)?;
    }
    if *edit_config {
        ConfigLogic::edit(cfg, &path, editor.as_deref())?;
    }

    Ok(())
}
