#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

pub const FIXTURE_DATA_DIR: &str = "tests/fixtures";

/// Isolated HOME/XDG dirs so no user config leaks into a run.
pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("marginminer"));
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd.env("XDG_DATA_HOME", home.path().join(".local").join("share"));
    cmd.env_remove("MARGINMINER_CONFIG");
    cmd.env_remove("MARGINMINER_DATA_DIR");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

/// Command rooted at the bundled FII exports.
pub fn fixture_cmd(home: &TempDir) -> Command {
    let mut cmd = base_cmd(home);
    cmd.arg("--data-dir").arg(FIXTURE_DATA_DIR);
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = fixture_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_cmd(home, &full)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

pub fn screen_tickers_json(home: &TempDir, args: &[&str]) -> Result<Vec<String>> {
    let mut full = vec!["screen"];
    full.extend_from_slice(args);
    let value = run_cmd_json(home, &full)?;
    Ok(value
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r["ticker"].as_str().map(str::to_string))
        .collect())
}

/// Write a sector export under `<data_dir>/csv/fii/<name>`; `name` may
/// contain subdirectories.
pub fn write_sector_csv(data_dir: &Path, name: &str, content: &[u8]) {
    let path = data_dir.join("csv").join("fii").join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create csv dir");
    }
    std::fs::write(path, content).expect("failed to write sector csv");
}
