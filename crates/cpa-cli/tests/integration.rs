#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn cpa(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cpa-logic").unwrap();
    cmd.current_dir(dir.path())
        .env("CPA_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

const TWO_RULES: &str = r#"
events:
  - name: connection-ready
    actions:
      - name: ctx-set
        modifier: first=true
  - name: connection-ready
    actions:
      - name: ctx-set
        modifier: second=true
"#;

// ---------------------------------------------------------------------------
// validate / show
// ---------------------------------------------------------------------------

#[test]
fn validate_builtin_manifest() {
    let dir = TempDir::new().unwrap();
    cpa(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manifest OK"))
        .stdout(predicate::str::contains("[warning]").not());
}

#[test]
fn validate_reports_unknown_names() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("m.yaml"),
        "events:\n  - name: connection-redy\n    actions:\n      - name: ctx-sett\n",
    )
    .unwrap();

    let v = json_stdout(cpa(&dir).args(["--json", "validate", "--manifest", "m.yaml"]));
    let warnings = v["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0]["kind"], "unknown_event");
    assert_eq!(warnings[1]["kind"], "unknown_action");
    assert_eq!(warnings[1]["path"], "events[0].actions[0]");
}

#[test]
fn validate_fails_on_malformed_manifest() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.yaml"), "events: [ {name: x, actions: 3 }").unwrap();

    cpa(&dir)
        .args(["validate", "--manifest", "bad.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse manifest err"));
}

#[test]
fn show_prints_branch_labels() {
    let dir = TempDir::new().unwrap();
    cpa(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("register-connection"))
        .stdout(predicate::str::contains("param-equals(kind=tx)"))
        .stdout(predicate::str::contains("TRUE:"));
}

#[test]
fn events_and_actions_are_listed() {
    let dir = TempDir::new().unwrap();
    let events = json_stdout(cpa(&dir).args(["--json", "events"]));
    assert!(events
        .as_array()
        .unwrap()
        .contains(&Value::from("register-media-proxy")));

    let actions = json_stdout(cpa(&dir).args(["--json", "actions"]));
    assert!(actions.as_array().unwrap().contains(&Value::from("ctx-set")));
}

// ---------------------------------------------------------------------------
// fire
// ---------------------------------------------------------------------------

#[test]
fn fire_register_connection_as_sender() {
    let dir = TempDir::new().unwrap();
    let v = json_stdout(cpa(&dir).args([
        "--json",
        "fire",
        "register-connection",
        "-p",
        "kind=tx",
        "-p",
        "conn_id=7",
    ]));
    assert_eq!(v["event"], "register-connection");
    assert_eq!(v["ctx"]["role"], "sender");
    assert_eq!(v["ctx"]["conn_id"], 7);
    assert_eq!(v["ctx"]["connection_registered"], true);
}

#[test]
fn fire_receiver_path_when_kind_differs() {
    let dir = TempDir::new().unwrap();
    let v = json_stdout(cpa(&dir).args([
        "--json",
        "fire",
        "register-connection",
        "-p",
        "kind=rx",
        "-p",
        "conn_id=8",
    ]));
    assert_eq!(v["ctx"]["role"], "receiver");
}

#[test]
fn action_errors_do_not_fail_the_command() {
    let dir = TempDir::new().unwrap();
    // No proxy_id: the false branch runs `fail`, which errors.
    let v = json_stdout(cpa(&dir).args([
        "--json",
        "fire",
        "register-media-proxy",
        "--ctx",
        r#"{"seed": 1}"#,
    ]));
    assert_eq!(v["ctx"], serde_json::json!({"seed": 1}));
}

#[test]
fn fire_trace_records_branches() {
    let dir = TempDir::new().unwrap();
    let v = json_stdout(cpa(&dir).args([
        "--json",
        "fire",
        "register-media-proxy",
        "-p",
        "proxy_id=p-1",
        "--trace",
    ]));
    let steps = v["steps"].as_array().unwrap();
    assert!(steps.iter().any(|s| s["type"] == "branch" && s["branch"] == "true"));
    assert_eq!(v["ctx"]["proxy_id"], "p-1");
    assert_eq!(v["ctx"]["proxy_registered"], true);
}

#[test]
fn fire_text_trace_shows_error() {
    let dir = TempDir::new().unwrap();
    cpa(&dir)
        .args(["fire", "register-media-proxy", "--trace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(--> FALSE branch)"))
        .stdout(predicate::str::contains("error: register-media-proxy without proxy_id"));
}

#[test]
fn fire_unknown_event_fails() {
    let dir = TempDir::new().unwrap();
    cpa(&dir)
        .args(["fire", "no-such-event"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown event: no-such-event"));
}

#[test]
fn fire_rejects_malformed_param() {
    let dir = TempDir::new().unwrap();
    cpa(&dir)
        .args(["fire", "connection-ready", "-p", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid param"));
}

#[test]
fn unmatched_event_returns_input_context() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("m.yaml"), TWO_RULES).unwrap();
    let v = json_stdout(cpa(&dir).args([
        "--json",
        "fire",
        "proxy-heartbeat",
        "--manifest",
        "m.yaml",
        "--ctx",
        r#"{"untouched": true}"#,
    ]));
    assert_eq!(v["ctx"], serde_json::json!({"untouched": true}));
}

#[test]
fn last_matching_rule_wins() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("m.yaml"), TWO_RULES).unwrap();
    let v = json_stdout(cpa(&dir).args([
        "--json",
        "fire",
        "connection-ready",
        "--manifest",
        "m.yaml",
    ]));
    assert_eq!(v["ctx"], serde_json::json!({"second": true}));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn configured_manifest_is_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("logic.yaml"), TWO_RULES).unwrap();
    std::fs::write(
        dir.path().join("cpa.yaml"),
        "manifest: logic.yaml\ntrace_actions: false\n",
    )
    .unwrap();

    let v = json_stdout(cpa(&dir).args(["--json", "fire", "connection-ready"]));
    assert_eq!(v["ctx"]["second"], true);
}

#[test]
fn config_validate_flags_missing_manifest() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cpa.yaml"), "manifest: gone.yaml\n").unwrap();

    cpa(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();
    cpa(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(built-in)"));
}
