//! # Temporal Checks
//!
//! Cross-field consistency of `created_at`, `ttl` and `expires_at`, plus
//! freshness against the injected "now".
//!
//! ## Stages
//!
//! 1. Parse `created_at`, `ttl` and `expires_at`. Each failure is its own
//!    issue and does not stop the other two parses.
//! 2. If all three parsed, run the consistency, future-created and expiry
//!    checks. They are independent: an inconsistent packet can also be
//!    expired, and both are reported.
//!
//! All deltas are floating-point seconds and every comparison is strict, so a
//! delta exactly equal to its tolerance passes.
//!
//! The consistency tolerance is `max(clock_skew, 1s)`. The one-second floor
//! applies even when the configured skew is smaller.

use ctxb_core::temporal::DEFAULT_DURATION_LABEL;
use ctxb_core::{IssueCode, Packet, TemporalError, Timestamp, TtlDuration, ValidationIssue};

use crate::config::ValidationConfig;

pub const CREATED_AT: &str = "created_at";
pub const TTL: &str = "ttl";
pub const EXPIRES_AT: &str = "expires_at";

/// Minimum tolerance for the `expires_at == created_at + ttl` check, in seconds.
pub const MISMATCH_TOLERANCE_FLOOR_SECS: f64 = 1.0;

/// Run the temporal checks on `packet`.
///
/// Contributes nothing unless all three time fields are present. A missing
/// one is a structural defect that the schema checker reports.
pub fn check_temporal(packet: &Packet, config: &ValidationConfig) -> Vec<ValidationIssue> {
    let (Some(created_raw), Some(ttl_raw), Some(expires_raw)) =
        (packet.get(CREATED_AT), packet.get(TTL), packet.get(EXPIRES_AT))
    else {
        tracing::debug!("time field missing, temporal checks skipped");
        return Vec::new();
    };

    let mut issues = Vec::new();

    let created_at = collect(
        Timestamp::from_json(created_raw),
        IssueCode::TimeInvalidCreatedAt,
        CREATED_AT,
        &mut issues,
    );
    let ttl = collect(
        TtlDuration::from_json(ttl_raw, DEFAULT_DURATION_LABEL),
        IssueCode::TimeInvalidTtl,
        TTL,
        &mut issues,
    );
    let expires_at = collect(
        Timestamp::from_json(expires_raw),
        IssueCode::TimeInvalidExpiresAt,
        EXPIRES_AT,
        &mut issues,
    );

    let (Some(created_at), Some(ttl), Some(expires_at)) = (created_at, ttl, expires_at) else {
        tracing::debug!(
            parse_issues = issues.len(),
            "unparsable time field, cross-checks skipped"
        );
        return issues;
    };

    issues.extend(check_consistency(&created_at, &ttl, &expires_at, config));
    issues.extend(check_not_future(&created_at, config));
    issues.extend(check_not_expired(&expires_at, config));
    issues
}

fn collect<T>(
    parsed: Result<T, TemporalError>,
    code: IssueCode,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            issues.push(ValidationIssue::new(code, path, e.to_string()));
            None
        }
    }
}

fn check_consistency(
    created_at: &Timestamp,
    ttl: &TtlDuration,
    expires_at: &Timestamp,
    config: &ValidationConfig,
) -> Option<ValidationIssue> {
    let Some(expected) = created_at.checked_add(ttl) else {
        return Some(ValidationIssue::new(
            IssueCode::TimeMismatch,
            EXPIRES_AT,
            format!(
                "created_at + ttl is outside the representable date range \
                 (created_at={created_at}, ttl={ttl}, got={expires_at})"
            ),
        ));
    };

    let delta = expires_at.seconds_since(&expected).abs();
    let tolerance = config
        .clock_skew
        .as_secs_f64()
        .max(MISMATCH_TOLERANCE_FLOOR_SECS);
    if delta <= tolerance {
        return None;
    }

    Some(ValidationIssue::new(
        IssueCode::TimeMismatch,
        EXPIRES_AT,
        format!(
            "expires_at does not match created_at + ttl within allowed tolerance \
             (expected={expected}, got={expires_at}, tolerance={})",
            config.clock_skew
        ),
    ))
}

fn check_not_future(created_at: &Timestamp, config: &ValidationConfig) -> Option<ValidationIssue> {
    let ahead = created_at.seconds_since(&config.now_utc);
    if ahead <= config.allow_future_created_at.as_secs_f64() {
        return None;
    }

    Some(ValidationIssue::new(
        IssueCode::TimeCreatedAtInFuture,
        CREATED_AT,
        format!(
            "created_at is too far in the future (created_at={created_at}, now={}, allowance={})",
            config.now_utc, config.allow_future_created_at
        ),
    ))
}

fn check_not_expired(expires_at: &Timestamp, config: &ValidationConfig) -> Option<ValidationIssue> {
    let overdue = config.now_utc.seconds_since(expires_at);
    if overdue <= config.clock_skew.as_secs_f64() {
        return None;
    }

    Some(ValidationIssue::new(
        IssueCode::TimeExpired,
        EXPIRES_AT,
        format!(
            "context packet is expired (expires_at={expires_at}, now={}, skew={})",
            config.now_utc, config.clock_skew
        ),
    ))
}
