//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

/// Run the orkg binary in the specified directory
pub fn run_orkg_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_orkg"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute orkg binary")
}

/// Run a command that must succeed and return its stdout
pub fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = run_orkg_in_dir(dir, args);
    assert!(
        output.status.success(),
        "orkg {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run a command with `--json` that must succeed and parse its stdout
pub fn run_json(dir: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let stdout = run_ok(dir, &full);
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

/// Create a resource with the given classes and return its id
pub fn create_resource(dir: &Path, label: &str, classes: &str) -> String {
    let json = run_json(
        dir,
        &["resource", "create", "--label", label, "--class", classes],
    );
    json["id"].as_str().expect("resource id").to_string()
}
