//! Integration test: run the binary against the fixture log.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nightly.log")
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("runlog_cli_{name}_{}", std::process::id()))
}

/// Command with diagnostics and config isolated from the user's environment.
fn runlog(name: &str) -> Command {
    let dir = scratch(name);
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_runlog"));
    cmd.arg("--log-file")
        .arg(dir.join("runlog.log"))
        .arg("--config")
        .arg(dir.join("missing.toml"))
        .env_remove("RUNLOG_THEME")
        .env_remove("RUNLOG_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "runlog failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_runlog"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn renders_tree_from_file() {
    let output = runlog("render")
        .arg(fixture())
        .args(["--width", "60", "--height", "12"])
        .output()
        .expect("Failed to execute binary");
    let out = stdout(&output);

    assert!(out.contains("Log (4/5)"), "{out}");
    assert!(out.contains("TASK [PASS] Checkout"), "{out}");
    assert!(out.contains("TASK [FAIL] Login"), "{out}");
    assert!(!out.contains("browser ready"), "collapsed element hides its log: {out}");
}

#[test]
fn filter_flag_narrows_rows() {
    let output = runlog("filter")
        .arg(fixture())
        .args(["--filter", "browser", "--json"])
        .output()
        .expect("Failed to execute binary");
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");

    let ids: Vec<&str> = json["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .filter_map(|r| r["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["0", "0-0", "0-0-0"]);
    assert_eq!(json["runIdsAndLabel"]["currentRunId"], "nightly-1");
}

#[test]
fn reads_from_stdin() {
    let mut child = runlog("stdin")
        .args(["--expand-all", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");
    let log = std::fs::read_to_string(fixture()).expect("fixture");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(log.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(json["rows"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["runInfo"]["status"], "FAIL");
}

#[test]
fn missing_file_fails() {
    let output = runlog("missing")
        .arg(scratch("missing").join("nope.log"))
        .output()
        .expect("Failed to execute binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
}
