pub mod config;
pub mod identity;
pub mod log;
pub mod log_file;
pub mod session;
pub mod tracker;
