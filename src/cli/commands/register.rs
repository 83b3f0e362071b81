use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::identity::IdentityLogic;
use crate::db::identity::load_identity;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle `register` and `whoami`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    match cmd {
        Commands::Register {
            name,
            user_id,
            mode,
        } => {
            let id = IdentityLogic::register(
                &mut pool,
                cfg,
                name.as_deref(),
                user_id.as_deref(),
                *mode,
            )?;
            success(format!(
                "Registered {} (ID {}, {})",
                id.name, id.user_id, id.work_mode
            ));
        }
        Commands::Whoami => match load_identity(&pool.conn)? {
            Some(id) => {
                println!("Name      : {}", id.name);
                println!("User ID   : {}", id.user_id);
                println!("Work mode : {}", id.work_mode);
            }
            None => info("No user registered yet. Run `lilotracker register`."),
        },
        _ => {}
    }

    Ok(())
}
