#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn timely() -> Command {
    cargo_bin_cmd!("timely")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timely.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh, empty output directory inside the system temp dir
pub fn temp_out_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timely_out", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create out dir");
    path
}

/// Run a command against `db_path` in test mode
pub fn run(db_path: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut all = vec!["--db", db_path, "--test"];
    all.extend_from_slice(args);
    timely().args(all).assert()
}

/// Initialize the DB and add one client ("Acme & Co.", 50/h), id 1
pub fn init_db_with_client(db_path: &str) {
    run(db_path, &["init"]).success();
    run(db_path, &["client", "add", "Acme & Co.", "--rate", "50"]).success();
}

/// Record a closed session through the CLI
pub fn add_session(db_path: &str, client_id: &str, from: &str, to: &str) {
    run(db_path, &["in", client_id, "--at", from]).success();
    run(db_path, &["out", "--at", to]).success();
}
