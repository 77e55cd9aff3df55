//! # ctxb-packet — Context Packet Validation
//!
//! Combines the two checkers into one verdict:
//!
//! - **Schema checker** (`ctxb-schema`): structural shape, no notion of time.
//! - **Temporal checker** ([`temporal`]): parses `created_at`, `ttl` and
//!   `expires_at` and cross-checks them against each other and an injected
//!   "now".
//!
//! Schema issues come first, then temporal issues. Neither checker stops at
//! the first defect, so a CI run sees everything wrong with a packet at once.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use ctxb_packet::{PacketValidator, ValidationConfig};
//! use serde_json::json;
//!
//! let validator = PacketValidator::new(&json!({"required": ["id"]})).unwrap();
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
//! let result = validator
//!     .validate_value(
//!         &json!({
//!             "id": "ctx-1",
//!             "created_at": "2024-01-01T00:00:00Z",
//!             "ttl": "1h",
//!             "expires_at": "2024-01-01T01:00:00Z"
//!         }),
//!         &ValidationConfig::at(now),
//!     )
//!     .unwrap();
//! assert!(result.ok());
//! ```
//!
//! ## Crate Policy
//!
//! - No I/O and no clock reads; the caller supplies the time.
//! - A compiled [`PacketValidator`] is immutable and can be shared across
//!   threads.

pub mod config;
pub mod temporal;
pub mod validation;

pub use config::{ValidationConfig, DEFAULT_ALLOW_FUTURE_CREATED_AT, DEFAULT_CLOCK_SKEW};
pub use temporal::check_temporal;
pub use validation::{validate_packet, PacketValidator};
