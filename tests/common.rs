#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn dmd() -> Command {
    cargo_bin_cmd!("dmdhub")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_dmdhub.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Run a command against `db_path` at a fixed clock and expect success.
pub fn run_at(db_path: &str, now: &str, args: &[&str]) {
    let mut full = vec!["--db", db_path, "--now", now];
    full.extend_from_slice(args);
    dmd().args(&full).assert().success();
}

/// Fresh database with an operator signed in for the next 30 days.
pub fn init_signed_in(name: &str, now: &str) -> String {
    let db_path = setup_test_db(name);

    dmd()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    run_at(&db_path, now, &["login", "--operator", "Mika", "--hours", "720"]);
    db_path
}

/// Two packages: #1 "Daily Pass" (fixed ₱299, 8 h) and #2 "Hourly" (₱49/h).
pub fn with_packages(db_path: &str, now: &str) {
    run_at(
        db_path,
        now,
        &["package", "add", "Daily Pass", "--price", "299", "--duration", "8"],
    );
    run_at(
        db_path,
        now,
        &["package", "add", "Hourly", "--price", "49", "--hourly"],
    );
}
