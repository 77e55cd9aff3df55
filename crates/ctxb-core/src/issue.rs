//! # Validation Issues and Results
//!
//! The accumulated output of a validation run. Issue codes are contractual:
//! CI tooling matches on the serialized strings, so a variant is never
//! renamed or repurposed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed taxonomy of packet defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Structural defect found by the schema checker.
    SchemaViolation,
    /// `created_at` is not an RFC 3339 date-time with timezone.
    TimeInvalidCreatedAt,
    /// `ttl` is not a positive `<n><unit>` duration.
    TimeInvalidTtl,
    /// `expires_at` is not an RFC 3339 date-time with timezone.
    TimeInvalidExpiresAt,
    /// `expires_at` disagrees with `created_at + ttl`.
    TimeMismatch,
    /// `created_at` lies too far ahead of the validator's clock.
    TimeCreatedAtInFuture,
    /// The packet expired more than the clock skew ago.
    TimeExpired,
}

impl IssueCode {
    /// All codes, in the order the validator can emit them.
    pub const ALL: [IssueCode; 7] = [
        Self::SchemaViolation,
        Self::TimeInvalidCreatedAt,
        Self::TimeInvalidTtl,
        Self::TimeInvalidExpiresAt,
        Self::TimeMismatch,
        Self::TimeCreatedAtInFuture,
        Self::TimeExpired,
    ];

    /// The wire name, e.g. `TIME_EXPIRED`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaViolation => "SCHEMA_VIOLATION",
            Self::TimeInvalidCreatedAt => "TIME_INVALID_CREATED_AT",
            Self::TimeInvalidTtl => "TIME_INVALID_TTL",
            Self::TimeInvalidExpiresAt => "TIME_INVALID_EXPIRES_AT",
            Self::TimeMismatch => "TIME_MISMATCH",
            Self::TimeCreatedAtInFuture => "TIME_CREATED_AT_IN_FUTURE",
            Self::TimeExpired => "TIME_EXPIRED",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single packet defect with enough context to act on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Machine-matched category.
    pub code: IssueCode,
    /// Human-readable detail.
    pub message: String,
    /// Locator into the packet (`ttl`, `tags[2]`), empty for the document root.
    pub path: String,
}

impl ValidationIssue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{} ({}): {}", self.code, self.path, self.message)
        }
    }
}

/// Verdict for one packet.
///
/// `ok` is derived from `issues` at construction, so `ok == issues.is_empty()`
/// holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    ok: bool,
    schema_version: Option<String>,
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new(schema_version: Option<String>, issues: Vec<ValidationIssue>) -> Self {
        Self {
            ok: issues.is_empty(),
            schema_version,
            issues,
        }
    }

    /// True iff no issues were found.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// The packet's `schema_version` string, if it had one.
    pub fn schema_version(&self) -> Option<&str> {
        self.schema_version.as_deref()
    }

    /// Issues in discovery order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Codes of all issues, in order.
    pub fn codes(&self) -> Vec<IssueCode> {
        self.issues.iter().map(|i| i.code).collect()
    }
}
