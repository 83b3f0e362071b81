use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkMode {
    /// Work from office
    #[value(name = "WFO", alias = "wfo")]
    Wfo,
    /// Work from home
    #[value(name = "WFH", alias = "wfh")]
    Wfh,
}

impl WorkMode {
    pub fn code(&self) -> &'static str {
        match self {
            WorkMode::Wfo => "WFO",
            WorkMode::Wfh => "WFH",
        }
    }

    /// Convert DB / config string → enum
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "WFO" => Some(WorkMode::Wfo),
            "WFH" => Some(WorkMode::Wfh),
            _ => None,
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
