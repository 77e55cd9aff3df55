//! # ctxb-cli — Command-Line Gate for Context Packets
//!
//! Provides the `ctxb` binary, the collaborator layer around the validation
//! engine: argument parsing, file loading, output rendering and exit codes.
//!
//! ```bash
//! ctxb validate packet.json
//! ctxb validate packet.yaml --schema schemas/context_packet.schema.v1.0.0.json --output text
//! ctxb -vv validate packet.json --clock-skew 2m --now 2024-01-01T00:30:00Z
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | packet is valid                                      |
//! | 1    | packet has schema or temporal issues                 |
//! | 2    | tooling error: bad arguments, unreadable/unparsable files |
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic; validation lives in
//!   `ctxb-packet`.
//! - Machine-readable output goes to stdout, logs go to stderr.

pub mod document;
pub mod logging;
pub mod output;
pub mod validate;

/// Exit code for a valid packet.
pub const EXIT_VALID: u8 = 0;

/// Exit code for a packet with at least one issue.
pub const EXIT_INVALID: u8 = 1;

/// Exit code for tooling failures.
pub const EXIT_TOOLING_ERROR: u8 = 2;

/// Schema used when `--schema` is not given, relative to the working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "schemas/context_packet.schema.v1.0.0.json";
