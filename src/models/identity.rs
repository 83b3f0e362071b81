use super::work_mode::WorkMode;
use serde::Serialize;

/// The person the tracker logs time for.
///
/// Loaded from the identity store as-is; only values collected from the
/// user are validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub user_id: String,
    pub work_mode: String,
}

impl Identity {
    pub fn new(name: &str, user_id: &str, work_mode: WorkMode) -> Self {
        Self {
            name: name.trim().to_string(),
            user_id: user_id.trim().to_string(),
            work_mode: work_mode.code().to_string(),
        }
    }
}
