//! Drives the `ctxb` binary end to end: exit codes, stdout verdicts and the
//! tooling-failure envelope.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn ctxb(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ctxb"))
        .current_dir(repo_root())
        .args(args)
        .output()
        .expect("failed to spawn ctxb")
}

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

const VALID_PACKET: &str = r#"{
  "schema_version": "1.0.0",
  "id": "ctx-0001",
  "source": "ingest/crm",
  "created_at": "2024-01-01T00:00:00Z",
  "ttl": "1h",
  "expires_at": "2024-01-01T01:00:00Z",
  "payload": {"summary": "quarterly numbers"}
}"#;

const NOW: &str = "2024-01-01T00:30:00Z";

#[test]
fn valid_packet_exits_zero_with_default_schema() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(dir.path(), "packet.json", VALID_PACKET);

    let output = ctxb(&["validate", &packet, "--now", NOW]);
    assert_eq!(output.status.code(), Some(0));

    let verdict = stdout_json(&output);
    assert_eq!(verdict["ok"], true);
    assert_eq!(verdict["schema_version"], "1.0.0");
    assert_eq!(verdict["issues"], Value::Array(Vec::new()));
}

#[test]
fn expired_packet_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(dir.path(), "packet.json", VALID_PACKET);

    let output = ctxb(&["validate", &packet, "--now", "2024-01-01T03:00:00Z"]);
    assert_eq!(output.status.code(), Some(1));

    let verdict = stdout_json(&output);
    assert_eq!(verdict["ok"], false);
    assert_eq!(verdict["issues"][0]["code"], "TIME_EXPIRED");
    assert_eq!(verdict["issues"][0]["path"], "expires_at");
}

#[test]
fn text_output_lists_each_issue() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(
        dir.path(),
        "packet.json",
        &VALID_PACKET.replace("\"id\": \"ctx-0001\",", "\"owner\": \"ops\","),
    );

    let output = ctxb(&["validate", &packet, "--now", NOW, "--output", "text"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "FAIL: packet is invalid",
            "- SCHEMA_VIOLATION (id): 'id' is a required property",
            "- SCHEMA_VIOLATION (owner): additional properties are not allowed ('owner' was unexpected)",
        ]
    );
}

#[test]
fn yaml_packet_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(
        dir.path(),
        "packet.yaml",
        "schema_version: \"1.0.0\"\n\
         id: ctx-0001\n\
         source: ingest/crm\n\
         created_at: \"2024-01-01T00:00:00Z\"\n\
         ttl: 1h\n\
         expires_at: \"2024-01-01T01:00:00Z\"\n\
         payload:\n  summary: quarterly numbers\n",
    );

    let output = ctxb(&["validate", &packet, "--now", NOW, "--output", "text"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "{}",
        String::from_utf8_lossy(&output.stdout)
    );
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "OK: packet is valid\n");
}

#[test]
fn explicit_schema_flag_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(dir.path(), "packet.json", VALID_PACKET);
    let schema = write(
        dir.path(),
        "schema.json",
        r#"{"required": ["owner"], "properties": {"id": {"type": "array"}}}"#,
    );

    let output = ctxb(&["validate", &packet, "--schema", &schema, "--now", NOW]);
    assert_eq!(output.status.code(), Some(1));

    let verdict = stdout_json(&output);
    assert_eq!(verdict["issues"][0]["path"], "owner");
    assert_eq!(verdict["issues"][1]["message"], "\"ctx-0001\" is not of type 'array'");
}

#[test]
fn bad_duration_flag_exits_two_with_arg_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(dir.path(), "packet.json", VALID_PACKET);

    let output = ctxb(&["validate", &packet, "--clock-skew", "1w", "--output", "text"]);
    assert_eq!(output.status.code(), Some(2));

    let envelope = stdout_json(&output);
    assert_eq!(envelope["ok"], false);
    assert_eq!(envelope["issues"][0]["code"], "ARG_INVALID");
    assert_eq!(envelope["issues"][0]["path"], "");
    assert!(envelope["issues"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("clock-skew must match"));
}

#[test]
fn missing_packet_exits_two_with_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json").display().to_string();

    let output = ctxb(&["validate", &missing, "--now", NOW]);
    assert_eq!(output.status.code(), Some(2));

    let envelope = stdout_json(&output);
    assert_eq!(envelope["issues"][0]["code"], "IO_ERROR");
    assert!(envelope["issues"][0]["message"]
        .as_str()
        .unwrap()
        .contains("failed to read packet file"));
}

#[test]
fn malformed_packet_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(dir.path(), "packet.json", "{\"id\": ");

    let output = ctxb(&["validate", &packet, "--now", NOW]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["issues"][0]["code"], "IO_ERROR");
}

#[test]
fn logs_stay_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let packet = write(dir.path(), "packet.json", VALID_PACKET);

    let output = ctxb(&["-vv", "--log-format", "json", "validate", &packet, "--now", NOW]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["ok"], true);

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("packet validated"), "{stderr}");
}
