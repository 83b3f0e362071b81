use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the effective configuration as YAML.
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("📄 Current configuration ({}):\n", Config::config_file().display());
        println!("{}", yaml);
        Ok(())
    }

    /// Open the configuration file in an editor, creating it first if needed.
    ///
    /// Order: `--editor`, then `$EDITOR` / `$VISUAL`, then the platform default.
    pub fn edit(cfg: &Config, path: &Path, editor: Option<&str>) -> AppResult<()> {
        if !path.exists() {
            cfg.save_to(path)?;
        }

        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });

        let requested = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        if run_editor(&requested, path) {
            success(format!("Configuration file edited using '{}'", requested));
            return Ok(());
        }

        warning(format!(
            "Editor '{}' not available, falling back to '{}'",
            requested, default_editor
        ));

        if run_editor(&default_editor, path) {
            success(format!(
                "Configuration file edited using fallback '{}'",
                default_editor
            ));
            Ok(())
        } else {
            Err(AppError::Config(format!(
                "failed to edit configuration file with '{}'",
                default_editor
            )))
        }
    }
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}
