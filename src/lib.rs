//! lilotracker library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod notify;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands::track;
use cli::parser::{Cli, Commands};
use config::Config;
use db::pool::DbPool;
use errors::AppResult;
use utils::time::resolve_now;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Register { .. } | Commands::Whoami => {
            cli::commands::register::handle(&cli.command, cfg)
        }
        Commands::Login => track::login(&mut DbPool::new(&cfg.database)?, cfg, now(cli)?),
        Commands::BreakStart => track::break_start(&mut DbPool::new(&cfg.database)?, now(cli)?),
        Commands::BreakEnd => track::break_end(&mut DbPool::new(&cfg.database)?, now(cli)?),
        Commands::Logout => track::logout(&mut DbPool::new(&cfg.database)?, cfg, now(cli)?),
        Commands::Status => track::status(&mut DbPool::new(&cfg.database)?, now(cli)?),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Send { .. } => cli::commands::send::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Shell => cli::commands::shell::handle(cli, cfg),
    }
}

fn now(cli: &Cli) -> AppResult<chrono::NaiveDateTime> {
    resolve_now(cli.at.as_ref())
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // configuration is loaded once, then command-line overrides win
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(log_file) = &cli.log_file {
        cfg.log_file = log_file.clone();
    }

    dispatch(&cli, &cfg)
}
