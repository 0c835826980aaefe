//! End-to-end tests for the lcgm-core binary.
//!
//! Each test writes its own parameter and subject files into a temp dir and
//! checks stdout payloads and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PARAMS: &str = r#"{
    "schema_version": "1.0.0",
    "n_outcomes": 1,
    "n_groups": 2,
    "theta": [[0.0, 0.0], [1.0, -1.0]],
    "beta": [[[5.0]], [[10.0]]],
    "sigma": [1.0],
    "times": [0.0, 1.0, 2.0],
    "limits": [{"lower": null, "upper": null}],
    "group_labels": ["low", "high"]
}"#;

const SUBJECTS: &str = r#"[
    {"id": "near-low", "covariates": [0.0], "outcomes": [[5.1, 4.8, null]]},
    {"id": "near-high", "covariates": [0.0], "outcomes": [[10.2, null, 9.7]]}
]"#;

/// Get a Command for the lcgm-core binary with a clean parameter environment.
fn lcgm_core(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lcgm-core").expect("lcgm-core binary should exist");
    cmd.env_remove("LCGM_PARAMS")
        .env_remove("LCGM_CONFIG_DIR")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"))
        .env("LCGM_LOG", "warn");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ============================================================================
// check / version / schema
// ============================================================================

#[test]
fn check_reports_snapshot() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let output = lcgm_core(&dir)
        .arg("--params")
        .arg(&params)
        .arg("check")
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json["status"], "valid");
    assert_eq!(json["params"]["summary"]["n_groups"], 2);
    assert_eq!(json["params"]["params_source"], "CLI argument");
}

#[test]
fn check_summary_format() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    lcgm_core(&dir)
        .args(["--format", "summary", "check", "--params"])
        .arg(&params)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("params ok: 2 groups, 1 outcomes"));
}

#[test]
fn params_from_environment() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let output = lcgm_core(&dir)
        .env("LCGM_PARAMS", &params)
        .arg("check")
        .assert()
        .success()
        .get_output()
        .clone();
    assert_eq!(
        stdout_json(&output)["params"]["params_source"],
        "environment variable"
    );
}

#[test]
fn params_from_config_dir() {
    let dir = TempDir::new().unwrap();
    write(&dir, "params.json", PARAMS);
    lcgm_core(&dir)
        .env("LCGM_CONFIG_DIR", dir.path())
        .arg("check")
        .assert()
        .success();
}

#[test]
fn missing_params_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    lcgm_core(&dir)
        .args(["check", "--params"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(11)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn unresolved_params_is_config_error() {
    let dir = TempDir::new().unwrap();
    lcgm_core(&dir)
        .arg("check")
        .assert()
        .code(11)
        .stderr(predicate::str::contains("ERR_CONFIG"));
}

#[test]
fn invalid_params_is_config_error() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", &PARAMS.replace("[1.0]", "[-1.0]"));
    lcgm_core(&dir)
        .args(["check", "--params"])
        .arg(&params)
        .assert()
        .code(11)
        .stderr(predicate::str::contains("sigma[0]"));
}

#[test]
fn version_prints_schema_version() {
    let dir = TempDir::new().unwrap();
    lcgm_core(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"params_schema_version\": \"1.0.0\""));
}

#[test]
fn schema_list_and_lookup() {
    let dir = TempDir::new().unwrap();
    lcgm_core(&dir)
        .args(["schema", "--list", "--format", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SubjectRecord"));

    let output = lcgm_core(&dir)
        .args(["schema", "PosteriorResult"])
        .assert()
        .success()
        .get_output()
        .clone();
    assert!(stdout_json(&output)["properties"]["posterior"].is_object());
}

#[test]
fn unknown_schema_is_args_error() {
    let dir = TempDir::new().unwrap();
    lcgm_core(&dir).args(["schema", "Bogus"]).assert().code(10);
}

#[test]
fn unknown_command_is_args_error() {
    let dir = TempDir::new().unwrap();
    lcgm_core(&dir)
        .arg("nonexistent-command")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// trajectory / collapse
// ============================================================================

#[test]
fn trajectory_prints_fitted_values() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let output = lcgm_core(&dir)
        .args(["trajectory", "--group", "1", "--outcome", "0", "--params"])
        .arg(&params)
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json["group_label"], "high");
    assert_eq!(json["values"], serde_json::json!([10.0, 10.0, 10.0]));
}

#[test]
fn trajectory_bad_group_is_args_error() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    lcgm_core(&dir)
        .args(["trajectory", "--group", "5", "--outcome", "0", "--params"])
        .arg(&params)
        .assert()
        .code(10)
        .stderr(predicate::str::contains("group index 5 out of range"));
}

#[test]
fn collapse_averages_groups() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let output = lcgm_core(&dir)
        .args(["collapse", "--outcome", "0", "--groupings", "0,1;1", "--params"])
        .arg(&params)
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json["lines"][0]["members"], serde_json::json!([0, 1]));
    assert_eq!(json["lines"][0]["values"], serde_json::json!([7.5, 7.5, 7.5]));
    assert_eq!(json["lines"][1]["values"], serde_json::json!([10.0, 10.0, 10.0]));
}

#[test]
fn collapse_empty_grouping_is_rejected() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    lcgm_core(&dir)
        .args(["collapse", "--outcome", "0", "--groupings", "0;", "--params"])
        .arg(&params)
        .assert()
        .code(10)
        .stderr(predicate::str::contains("grouping 1"));
}

// ============================================================================
// posterior
// ============================================================================

#[test]
fn posterior_scores_each_subject() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let subjects = write(&dir, "subjects.json", SUBJECTS);
    let output = lcgm_core(&dir)
        .arg("--params")
        .arg(&params)
        .arg("posterior")
        .arg("--subjects")
        .arg(&subjects)
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json["scored"], 2);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["subjects"][0]["id"], "near-low");
    assert_eq!(json["subjects"][0]["status"], "scored");
    assert_eq!(json["subjects"][0]["modal_group"], 0);
    assert_eq!(json["subjects"][1]["modal_group"], 1);
    assert!(json["run_id"].as_str().unwrap().starts_with("run-"));
}

#[test]
fn posterior_accepts_single_object() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let subjects = write(
        &dir,
        "one.json",
        r#"{"covariates": [0.0], "outcomes": [[null, null, null]]}"#,
    );
    lcgm_core(&dir)
        .args(["--format", "summary", "posterior", "--params"])
        .arg(&params)
        .arg("--subjects")
        .arg(&subjects)
        .assert()
        .success()
        .stdout(predicate::str::contains("#0: high (p=0.7311)"))
        .stdout(predicate::str::contains("1 subjects: 1 scored, 0 failed"));
}

#[test]
fn posterior_failure_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let subjects = write(
        &dir,
        "subjects.json",
        r#"[
            {"id": "bad", "covariates": [0.0, 1.0], "outcomes": [[5.0, 5.0, 5.0]]},
            {"id": "good", "covariates": [0.0], "outcomes": [[10.0, 10.0, 10.0]]}
        ]"#,
    );
    let output = lcgm_core(&dir)
        .args(["posterior", "--params"])
        .arg(&params)
        .arg("--subjects")
        .arg(&subjects)
        .assert()
        .code(12)
        .get_output()
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["subjects"][0]["status"], "failed");
    assert_eq!(json["subjects"][0]["error"]["code"], 80);
    assert_eq!(json["subjects"][1]["status"], "scored");
    assert_eq!(json["subjects"][1]["modal_group"], 1);
}

#[test]
fn malformed_subjects_are_input_error() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    let subjects = write(&dir, "subjects.json", "[{\"covariates\": \"oops\"}]");
    lcgm_core(&dir)
        .args(["posterior", "--params"])
        .arg(&params)
        .arg("--subjects")
        .arg(&subjects)
        .assert()
        .code(12);
}

#[test]
fn missing_subjects_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let params = write(&dir, "params.json", PARAMS);
    lcgm_core(&dir)
        .args(["posterior", "--params"])
        .arg(&params)
        .arg("--subjects")
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(21);
}
