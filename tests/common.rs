#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn wn() -> Command {
    let mut cmd = cargo_bin_cmd!("worknight");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Unique config file path inside the system temp dir, removed if it exists
pub fn temp_config(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("worknight_{name}"));
    fs::remove_dir_all(&path).ok();
    path.push("config.yaml");
    path.to_string_lossy().to_string()
}

/// Temp config file pre-filled with `content`
pub fn temp_config_with(name: &str, content: &str) -> String {
    let path = temp_config(name);
    let p = PathBuf::from(&path);
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).expect("create config dir");
    }
    fs::write(&p, content).expect("write config");
    path
}
