use crate::config::Config;
use crate::db::identity::{load_identity, save_identity};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::identity::Identity;
use crate::models::work_mode::WorkMode;
use crate::ui::prompt::ask_string;

/// Reading and registering the tracked user.
pub struct IdentityLogic;

impl IdentityLogic {
    /// Return the stored identity, collecting it interactively the first
    /// time it is needed.
    pub fn ensure(pool: &mut DbPool, cfg: &Config) -> AppResult<Identity> {
        if let Some(id) = load_identity(&pool.conn)? {
            return Ok(id);
        }
        Self::register(pool, cfg, None, None, None)
    }

    /// Store a new identity. Missing values are asked for on stdin.
    pub fn register(
        pool: &mut DbPool,
        cfg: &Config,
        name: Option<&str>,
        user_id: Option<&str>,
        mode: Option<WorkMode>,
    ) -> AppResult<Identity> {
        let name = match name {
            Some(n) => n.to_string(),
            None => ask_string("Please enter your name")?,
        };
        let user_id = match user_id {
            Some(u) => u.to_string(),
            None => ask_string("Please enter your User ID")?,
        };
        let mode = match mode {
            Some(m) => m,
            None => WorkMode::from_code(&cfg.default_work_mode)
                .ok_or_else(|| AppError::InvalidWorkMode(cfg.default_work_mode.clone()))?,
        };

        let identity = build_identity(&name, &user_id, mode)?;
        save_identity(&pool.conn, &identity)?;

        ttlog_soft(
            &pool.conn,
            "register",
            &identity.user_id,
            &format!("Registered {} ({})", identity.name, identity.work_mode),
        );

        Ok(identity)
    }
}

/// Validate freshly collected values; stored identities skip this.
pub fn build_identity(name: &str, user_id: &str, mode: WorkMode) -> AppResult<Identity> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidIdentity("name is required".into()));
    }
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidIdentity("user ID is required".into()));
    }
    Ok(Identity::new(name, user_id, mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_with_all_values_skips_prompts() {
        let mut pool = DbPool::in_memory().unwrap();
        let cfg = Config::default();

        let id = IdentityLogic::register(
            &mut pool,
            &cfg,
            Some(" Ada "),
            Some("U-42"),
            Some(WorkMode::Wfh),
        )
        .unwrap();
        assert_eq!(id.name, "Ada");
        assert_eq!(id.work_mode, "WFH");

        assert_eq!(IdentityLogic::ensure(&mut pool, &cfg).unwrap(), id);
    }

    #[test]
    fn configured_default_mode_is_used() {
        let mut pool = DbPool::in_memory().unwrap();
        let cfg = Config {
            default_work_mode: "wfh".into(),
            ..Config::default()
        };

        let id = IdentityLogic::register(&mut pool, &cfg, Some("Ada"), Some("1"), None).unwrap();
        assert_eq!(id.work_mode, "WFH");
    }

    #[test]
    fn blank_values_are_rejected() {
        assert!(matches!(
            build_identity("  ", "U-1", WorkMode::Wfo),
            Err(AppError::InvalidIdentity(_))
        ));
        assert!(matches!(
            build_identity("Ada", "", WorkMode::Wfo),
            Err(AppError::InvalidIdentity(_))
        ));
    }
}
