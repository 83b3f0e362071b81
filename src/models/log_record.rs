use super::identity::Identity;
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::utils::time::{format_duration, format_timestamp};
use serde::Serialize;

/// Column headers of the tracker log, in file order.
pub const LOG_HEADERS: [&str; 8] = [
    "Date",
    "Username",
    "User ID",
    "Work Mode",
    "Login Time",
    "Each Break Time",
    "Logout Time",
    "Total Working Hours",
];

/// One row of the tracker log (one completed session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "User ID")]
    pub user_id: String,
    #[serde(rename = "Work Mode")]
    pub work_mode: String,
    #[serde(rename = "Login Time")]
    pub login_time: String,
    #[serde(rename = "Each Break Time")]
    pub break_times: String,
    #[serde(rename = "Logout Time")]
    pub logout_time: String,
    #[serde(rename = "Total Working Hours")]
    pub total_working_hours: String,
}

impl LogRecord {
    /// Build the row for a session that has been ended.
    pub fn from_session(session: &Session, identity: &Identity, separator: &str) -> AppResult<Self> {
        let (login, logout, total) = match (
            session.login(),
            session.logout(),
            session.total_working_duration(),
        ) {
            (Some(login), Some(logout), Some(total)) => (login, logout, total),
            _ => {
                return Err(AppError::InvalidTimeRange(
                    "cannot log a session that has not ended".into(),
                ));
            }
        };

        Ok(Self {
            date: logout.format("%Y-%m-%d").to_string(),
            username: identity.name.clone(),
            user_id: identity.user_id.clone(),
            work_mode: identity.work_mode.clone(),
            login_time: format_timestamp(&login),
            break_times: session.breaks_field(separator),
            logout_time: format_timestamp(&logout),
            total_working_hours: format_duration(total),
        })
    }

    /// Cell values in `LOG_HEADERS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.username.clone(),
            self.user_id.clone(),
            self.work_mode.clone(),
            self.login_time.clone(),
            self.break_times.clone(),
            self.logout_time.clone(),
            self.total_working_hours.clone(),
        ]
    }
}
