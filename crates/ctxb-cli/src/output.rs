//! # Verdict Rendering
//!
//! JSON output is the CI contract:
//!
//! ```json
//! { "ok": false, "schema_version": "1.0.0",
//!   "issues": [{ "code": "TIME_EXPIRED", "message": "...", "path": "expires_at" }] }
//! ```
//!
//! Text output is for humans:
//!
//! ```text
//! FAIL: packet is invalid
//! - TIME_EXPIRED (expires_at): context packet is expired (...)
//! ```
//!
//! Tooling failures always render as a JSON envelope with a single
//! `ARG_INVALID` or `IO_ERROR` entry, whatever `--output` says.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use ctxb_core::ValidationResult;
use serde_json::json;

/// Verdict format selected by `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Category of a failure that prevented validation from running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A flag value did not parse.
    ArgInvalid,
    /// A file could not be read, parsed, or had the wrong top-level shape.
    Io,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArgInvalid => "ARG_INVALID",
            Self::Io => "IO_ERROR",
        }
    }
}

/// Render a validation verdict.
pub fn render_result(result: &ValidationResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(render_text(result)),
    }
}

fn render_text(result: &ValidationResult) -> String {
    if result.ok() {
        return "OK: packet is valid".to_string();
    }
    let mut out = String::from("FAIL: packet is invalid");
    for issue in result.issues() {
        let _ = write!(out, "\n- {issue}");
    }
    out
}

/// Render the envelope for a tooling failure.
pub fn render_failure(kind: FailureKind, message: &str) -> Result<String> {
    let envelope = json!({
        "ok": false,
        "issues": [{
            "code": kind.code(),
            "message": message,
            "path": "",
        }],
    });
    Ok(serde_json::to_string_pretty(&envelope)?)
}
