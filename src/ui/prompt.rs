//! Interactive prompts on stdin.

use crate::errors::AppResult;
use crate::ui::messages::warning;
use std::io::{self, BufRead, Write};

/// Ask for one line of input; returns the trimmed answer (possibly empty).
pub fn ask_string(prompt: &str) -> AppResult<String> {
    print!("{prompt}: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Ask a yes/no confirmation from the user
pub fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
