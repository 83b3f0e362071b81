#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Per-test sandbox: its own HOME (so no real config is read), database
/// and spreadsheet log, all under the system temp dir.
pub struct TestEnv {
    pub root: PathBuf,
    pub home: PathBuf,
    pub db: String,
    pub log: String,
}

pub fn setup(name: &str) -> TestEnv {
    let mut root: PathBuf = env::temp_dir();
    root.push(format!("lilotracker_it_{}", name));
    fs::remove_dir_all(&root).ok();

    let home = root.join("home");
    fs::create_dir_all(&home).expect("create test home");

    TestEnv {
        db: root.join("tracker.sqlite").to_string_lossy().to_string(),
        log: root.join("tracker_log.xlsx").to_string_lossy().to_string(),
        home,
        root,
    }
}

/// The binary, wired to the sandbox.
pub fn lilo(env: &TestEnv) -> Command {
    let mut cmd = cargo_bin_cmd!("lilotracker");
    cmd.env("HOME", &env.home)
        .args(["--db", &env.db, "--log-file", &env.log]);
    cmd
}

/// The binary against another database, sharing the sandbox log file.
pub fn lilo_with_db(env: &TestEnv, db: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("lilotracker");
    cmd.env("HOME", &env.home)
        .args(["--db", db, "--log-file", &env.log]);
    cmd
}

/// Same as `lilo`, with the clock pinned to `at`.
pub fn lilo_at(env: &TestEnv, at: &str) -> Command {
    let mut cmd = lilo(env);
    cmd.args(["--at", at]);
    cmd
}

pub fn register(env: &TestEnv) {
    lilo(env)
        .args(["register", "--name", "Ada", "--id", "U-42", "--mode", "WFH"])
        .assert()
        .success();
}

/// Write a config file into the sandbox HOME.
pub fn write_config(env: &TestEnv, yaml: &str) {
    let dir = env.home.join(".lilotracker");
    fs::create_dir_all(&dir).expect("create config dir");
    fs::write(dir.join("lilotracker.conf"), yaml).expect("write config");
}

/// Run one complete session: 09:00 login, 09:30-09:45 break, 17:00 logout.
pub fn log_reference_day(env: &TestEnv, day: &str) {
    lilo_at(env, &format!("{day} 09:00:00")).arg("login").assert().success();
    lilo_at(env, &format!("{day} 09:30:00")).arg("break-start").assert().success();
    lilo_at(env, &format!("{day} 09:45:00")).arg("break-end").assert().success();
    lilo_at(env, &format!("{day} 17:00:00")).arg("logout").assert().success();
}
