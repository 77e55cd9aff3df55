//! # Error Types
//!
//! Tooling-level failures. All errors use `thiserror` for derive-based
//! `Display` and `Error` implementations.
//!
//! Packet defects are NOT represented here. A malformed `ttl` inside a packet
//! surfaces as a [`TemporalError`] from the parser, which the temporal
//! checker immediately converts into a `ValidationIssue`. Only the caller's
//! own inputs (a non-object document, a bad tolerance flag) escape as `Err`.

use thiserror::Error;

/// Top-level error type for the packet validator.
#[derive(Error, Debug)]
pub enum CtxbError {
    /// The parsed top-level JSON value is not an object.
    #[error("{document} JSON must be an object, got {found}")]
    InvalidPacketShape {
        /// Which document was rejected (`"packet"` or `"schema"`).
        document: &'static str,
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// A duration or timestamp supplied by the caller did not parse.
    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse failure for a duration or timestamp string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// The value is not a `<positive-integer><s|m|h|d>` duration.
    #[error("{label} {reason}")]
    InvalidDuration {
        /// Field or flag being parsed, e.g. `ttl` or `clock-skew`.
        label: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The value is not an RFC 3339 date-time with explicit timezone.
    #[error("{0}")]
    InvalidTimestamp(String),
}

impl TemporalError {
    pub(crate) fn duration(label: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_duration_message_names_label() {
        let err = TemporalError::duration("clock-skew", "must be positive");
        assert_eq!(err.to_string(), "clock-skew must be positive");
    }

    #[test]
    fn packet_shape_message() {
        let err = CtxbError::InvalidPacketShape {
            document: "schema",
            found: "array",
        };
        assert_eq!(err.to_string(), "schema JSON must be an object, got array");
    }

    #[test]
    fn temporal_error_is_transparent() {
        let err: CtxbError = TemporalError::InvalidTimestamp("bad".into()).into();
        assert_eq!(err.to_string(), "bad");
    }
}
