use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::notify::{CommandMailer, Notifier};
use crate::ui::messages::success;
use crate::ui::prompt::ask_string;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Send { to } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        send_log(&mut pool, cfg, to.as_deref())?;
    }

    Ok(())
}

/// Mail the spreadsheet log; the recipient is prompted when not given.
pub fn send_log(pool: &mut DbPool, cfg: &Config, to: Option<&str>) -> AppResult<()> {
    let recipient = match to {
        Some(r) => r.to_string(),
        None => ask_string("Enter recipient's email")?,
    };

    let attachment = cfg.log_file_path();
    let mailer = CommandMailer::new(cfg.mail.clone());
    mailer.send(&recipient, &attachment)?;

    ttlog_soft(
        &pool.conn,
        "send",
        recipient.trim(),
        &format!("Sent {}", attachment.display()),
    );
    success(format!("Log sent to {}", recipient.trim()));
    Ok(())
}
