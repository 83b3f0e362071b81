use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Spreadsheet log path; empty means "next to the database".
    #[serde(default)]
    pub log_file: String,
    #[serde(default = "default_work_mode")]
    pub default_work_mode: String,
    #[serde(default = "default_break_separator")]
    pub break_separator: String,
    #[serde(default)]
    pub mail: MailConfig,
}

/// External mail client used by `send`.
///
/// `args` may contain the placeholders `{to}`, `{subject}` and `{attachment}`;
/// `body` is written to the program's stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub program: String,
    pub args: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_body")]
    pub body: String,
}

/// `~` and `~/...` resolve against the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(h)) => h,
        (p, Some(h)) if p.starts_with("~/") => h.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

fn default_work_mode() -> String {
    "WFO".to_string()
}
fn default_break_separator() -> String {
    ", ".to_string()
}
fn default_subject() -> String {
    "Daily Activity Log".to_string()
}
fn default_body() -> String {
    "Attached is the daily tracker log.".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            program: "mutt".to_string(),
            args: vec![
                "-s".to_string(),
                "{subject}".to_string(),
                "-a".to_string(),
                "{attachment}".to_string(),
                "--".to_string(),
                "{to}".to_string(),
            ],
            subject: default_subject(),
            body: default_body(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            log_file: String::new(),
            default_work_mode: default_work_mode(),
            break_separator: default_break_separator(),
            mail: MailConfig::default(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("lilotracker")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".lilotracker")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("lilotracker.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("lilotracker.sqlite")
    }

    /// Resolved path of the spreadsheet log.
    pub fn log_file_path(&self) -> PathBuf {
        if self.log_file.trim().is_empty() {
            Path::new(&self.database)
                .parent()
                .map(|dir| dir.join("tracker_log.xlsx"))
                .unwrap_or_else(|| PathBuf::from("tracker_log.xlsx"))
        } else {
            expand_tilde(&self.log_file)
        }
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = fs::File::create(path).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Initialize configuration directory and file.
    ///
    /// Returns the configuration to use for the rest of `init`.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB path: user provided (as given on the command line) or default
        let db_path = match custom_db {
            Some(name) => expand_tilde(&name),
            None => dir.join("lilotracker.sqlite"),
        };

        let mut config = Self::load()?;
        config.database = db_path.to_string_lossy().to_string();

        if !is_test {
            config.save_to(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(config)
    }
}
