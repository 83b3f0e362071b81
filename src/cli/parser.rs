use crate::export::ExportFormat;
use crate::models::work_mode::WorkMode;
use clap::{Parser, Subcommand};

/// Command-line interface definition for lilotracker
#[derive(Parser)]
#[command(
    name = "lilotracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Login/logout tracker: record breaks, compute working hours and keep a spreadsheet log",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the spreadsheet log path
    #[arg(global = true, long = "log-file", value_name = "FILE")]
    pub log_file: Option<String>,

    /// Use this instant instead of the clock ("YYYY-MM-DD HH:MM:SS")
    #[arg(global = true, long = "at", hide = true)]
    pub at: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration, the database and the spreadsheet log
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Register (or replace) the tracked user; missing values are prompted
    Register {
        #[arg(long)]
        name: Option<String>,

        #[arg(long = "id", value_name = "USER_ID")]
        user_id: Option<String>,

        /// Work mode: WFO (office) or WFH (home)
        #[arg(long, value_enum)]
        mode: Option<WorkMode>,
    },

    /// Show the registered user
    Whoami,

    /// Start the working session
    Login,

    /// Start a break
    #[command(alias = "break")]
    BreakStart,

    /// End the current break
    #[command(alias = "resume")]
    BreakEnd,

    /// End the session, compute working hours and append the log row
    Logout,

    /// Show the current session
    Status,

    /// List logged sessions
    List {
        /// Filter by period (YYYY, YYYY-MM, YYYY-MM-DD, ranges like
        /// 2025-06:2025-08, or "all")
        #[arg(long, short)]
        period: Option<String>,
    },

    /// Export the tracker log
    Export {
        #[arg(long, value_enum, value_name = "FORMAT", default_value = "csv")]
        format: ExportFormat,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Date range to export (same syntax as `list --period`)
        #[arg(long, value_name = "RANGE")]
        range: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Email the spreadsheet log through the configured mail client
    Send {
        /// Recipient address (prompted when omitted)
        #[arg(long)]
        to: Option<String>,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        /// Only the most recent N entries
        #[arg(long, value_name = "N", requires = "print")]
        last: Option<usize>,
    },

    /// Interactive mode: type login, break, resume, logout, status, send, exit
    Shell,
}
