pub mod config;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod register;
pub mod send;
pub mod shell;
pub mod track;
