//! # Validate Subcommand
//!
//! `ctxb validate PACKET` is the CI gate. It loads the packet and schema, parses
//! the tolerance flags, runs the validator and prints the verdict.
//!
//! Flag and file problems short-circuit with exit code 2 and an
//! `ARG_INVALID`/`IO_ERROR` envelope; they are never mixed into the packet's
//! issue list.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use ctxb_core::{parse_duration, Packet, Timestamp};
use ctxb_packet::{
    PacketValidator, ValidationConfig, DEFAULT_ALLOW_FUTURE_CREATED_AT, DEFAULT_CLOCK_SKEW,
};

use crate::document::load_document;
use crate::output::{render_failure, render_result, FailureKind, OutputFormat};
use crate::{DEFAULT_SCHEMA_PATH, EXIT_INVALID, EXIT_TOOLING_ERROR, EXIT_VALID};

/// Arguments for the `ctxb validate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Context packet file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(value_name = "PACKET")]
    pub packet: PathBuf,

    /// Schema file to validate against.
    #[arg(long, default_value = DEFAULT_SCHEMA_PATH)]
    pub schema: PathBuf,

    /// Allowed clock skew when judging expiry and expires_at consistency.
    #[arg(long, default_value = DEFAULT_CLOCK_SKEW)]
    pub clock_skew: String,

    /// Allowed distance of created_at ahead of the current time.
    #[arg(long, default_value = DEFAULT_ALLOW_FUTURE_CREATED_AT)]
    pub allow_future_created_at: String,

    /// Verdict format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Validate as of this RFC 3339 instant instead of the system clock.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<String>,
}

/// A failure that prevented validation from running.
#[derive(Debug)]
struct ToolingFailure {
    kind: FailureKind,
    error: anyhow::Error,
}

impl ToolingFailure {
    fn arg(error: impl Into<anyhow::Error>) -> Self {
        Self {
            kind: FailureKind::ArgInvalid,
            error: error.into(),
        }
    }

    fn io(error: impl Into<anyhow::Error>) -> Self {
        Self {
            kind: FailureKind::Io,
            error: error.into(),
        }
    }
}

/// Execute the validate subcommand, printing the verdict to stdout.
///
/// Returns exit code: 0 on a valid packet, 1 on validation failure, 2 on
/// tooling error.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, &mut out)
}

/// Execute the validate subcommand, writing the verdict to `out`.
///
/// `Err` is only returned if writing to `out` fails.
pub fn run_validate_to(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let (rendered, code) = match prepare(args) {
        Ok((packet, validator, config)) => {
            let result = validator.validate(&packet, &config);
            tracing::info!(
                ok = result.ok(),
                issues = result.issues().len(),
                packet = %args.packet.display(),
                "packet validated"
            );
            let code = if result.ok() { EXIT_VALID } else { EXIT_INVALID };
            (render_result(&result, args.output)?, code)
        }
        Err(failure) => {
            let message = format!("{:#}", failure.error);
            tracing::error!(code = failure.kind.code(), "{message}");
            (render_failure(failure.kind, &message)?, EXIT_TOOLING_ERROR)
        }
    };

    writeln!(out, "{rendered}").context("failed to write verdict")?;
    Ok(code)
}

type Prepared = (Packet, PacketValidator, ValidationConfig);

fn prepare(args: &ValidateArgs) -> Result<Prepared, ToolingFailure> {
    let config = build_config(args)?;

    let packet = load_document(&args.packet, "packet").map_err(ToolingFailure::io)?;
    let packet = Packet::from_value(packet).map_err(ToolingFailure::io)?;

    let schema = load_document(&args.schema, "schema").map_err(ToolingFailure::io)?;
    let validator = PacketValidator::new(&schema).map_err(ToolingFailure::io)?;

    Ok((packet, validator, config))
}

fn build_config(args: &ValidateArgs) -> Result<ValidationConfig, ToolingFailure> {
    let clock_skew = parse_duration(&args.clock_skew, "clock-skew").map_err(ToolingFailure::arg)?;
    let allow_future = parse_duration(&args.allow_future_created_at, "allow-future-created-at")
        .map_err(ToolingFailure::arg)?;

    let now = match &args.now {
        Some(raw) => {
            let ts = Timestamp::parse(raw)
                .context("invalid --now")
                .map_err(ToolingFailure::arg)?;
            *ts.as_datetime()
        }
        None => Utc::now(),
    };

    tracing::debug!(
        clock_skew = %clock_skew,
        allow_future_created_at = %allow_future,
        now = %Timestamp::from_utc(now),
        "validation settings"
    );

    Ok(ValidationConfig::at(now)
        .with_clock_skew(clock_skew)
        .with_allow_future_created_at(allow_future))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn args(packet: PathBuf, schema: PathBuf) -> ValidateArgs {
        ValidateArgs {
            packet,
            schema,
            clock_skew: DEFAULT_CLOCK_SKEW.to_string(),
            allow_future_created_at: DEFAULT_ALLOW_FUTURE_CREATED_AT.to_string(),
            output: OutputFormat::Json,
            now: Some("2024-01-01T00:30:00Z".to_string()),
        }
    }

    fn fixture(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn run(args: &ValidateArgs) -> (u8, String) {
        let mut out = Vec::new();
        let code = run_validate_to(args, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    const PACKET: &str = r#"{
        "created_at": "2024-01-01T00:00:00Z",
        "ttl": "1h",
        "expires_at": "2024-01-01T01:00:00Z"
    }"#;

    #[test]
    fn bad_clock_skew_is_arg_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let packet = fixture(&dir, "p.json", PACKET);
        let schema = fixture(&dir, "s.json", "{}");
        let mut a = args(packet, schema);
        a.clock_skew = "0s".into();

        let (code, out) = run(&a);
        assert_eq!(code, EXIT_TOOLING_ERROR);
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["issues"][0]["code"], "ARG_INVALID");
        assert_eq!(value["issues"][0]["message"], "clock-skew must be positive");
    }

    #[test]
    fn bad_now_is_arg_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let packet = fixture(&dir, "p.json", PACKET);
        let schema = fixture(&dir, "s.json", "{}");
        let mut a = args(packet, schema);
        a.now = Some("2024-01-01T00:00:00".into());

        let (code, out) = run(&a);
        assert_eq!(code, EXIT_TOOLING_ERROR);
        assert!(out.contains("ARG_INVALID"));
        assert!(out.contains("invalid --now"));
    }

    #[test]
    fn arg_errors_win_over_missing_files() {
        let mut a = args(
            PathBuf::from("/nonexistent/p.json"),
            PathBuf::from("/nonexistent/s.json"),
        );
        a.allow_future_created_at = "soon".into();
        let (code, out) = run(&a);
        assert_eq!(code, EXIT_TOOLING_ERROR);
        assert!(out.contains("ARG_INVALID"));
    }

    #[test]
    fn non_object_packet_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let packet = fixture(&dir, "p.json", "[1, 2, 3]");
        let schema = fixture(&dir, "s.json", "{}");
        let (code, out) = run(&args(packet, schema));
        assert_eq!(code, EXIT_TOOLING_ERROR);
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["issues"][0]["code"], "IO_ERROR");
        assert_eq!(value["issues"][0]["message"], "packet JSON must be an object, got array");
    }

    #[test]
    fn non_object_schema_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let packet = fixture(&dir, "p.json", PACKET);
        let schema = fixture(&dir, "s.json", "\"schema\"");
        let (code, out) = run(&args(packet, schema));
        assert_eq!(code, EXIT_TOOLING_ERROR);
        assert!(out.contains("IO_ERROR"));
    }

    #[test]
    fn valid_packet_with_empty_schema_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let packet = fixture(&dir, "p.json", PACKET);
        let schema = fixture(&dir, "s.json", "{}");
        let (code, out) = run(&args(packet, schema));
        assert_eq!(code, EXIT_VALID);
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["schema_version"], Value::Null);
    }

    #[test]
    fn now_flag_drives_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let packet = fixture(&dir, "p.json", PACKET);
        let schema = fixture(&dir, "s.json", "{}");
        let mut a = args(packet, schema);
        a.now = Some("2024-01-01T02:00:00Z".into());
        a.output = OutputFormat::Text;

        let (code, out) = run(&a);
        assert_eq!(code, EXIT_INVALID);
        assert!(out.starts_with("FAIL: packet is invalid\n- TIME_EXPIRED (expires_at): "));
    }

    #[test]
    fn wider_skew_tolerates_late_check() {
        let dir = tempfile::tempdir().unwrap();
        let packet = fixture(&dir, "p.json", PACKET);
        let schema = fixture(&dir, "s.json", "{}");
        let mut a = args(packet, schema);
        a.now = Some("2024-01-01T02:00:00Z".into());
        a.clock_skew = "2h".into();
        a.output = OutputFormat::Text;

        let (code, out) = run(&a);
        assert_eq!(code, EXIT_VALID);
        assert_eq!(out, "OK: packet is valid\n");
    }
}
