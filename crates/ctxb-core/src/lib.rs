//! # ctxb-core — Foundational Types for the Packet Validator
//!
//! Every other crate in the workspace depends on `ctxb-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Two error channels.** Tooling failures (`CtxbError`) are returned as
//!    `Err`. Packet defects are never errors: they are accumulated as
//!    [`ValidationIssue`]s and folded into a [`ValidationResult`].
//!
//! 2. **Contractual issue codes.** [`IssueCode`] is a closed enum whose
//!    serialized names are matched by CI tooling. Variants are never renamed.
//!
//! 3. **UTC timestamps with full precision.** [`Timestamp`] normalizes any
//!    explicit offset to UTC and keeps sub-second digits, since expiry and
//!    consistency checks compare exact deltas.
//!
//! 4. **Exact durations.** [`TtlDuration`] only knows seconds, minutes,
//!    hours and 24-hour days. No calendar arithmetic.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ctxb-*` crates.
//! - No I/O and no wall-clock reads. The caller injects "now".
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod issue;
pub mod packet;
pub mod temporal;

pub use error::{CtxbError, TemporalError};
pub use issue::{IssueCode, ValidationIssue, ValidationResult};
pub use packet::{require_object, Packet, ValueKind};
pub use temporal::{parse_duration, parse_timestamp, DurationUnit, Timestamp, TtlDuration};
