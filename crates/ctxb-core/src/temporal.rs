//! # Temporal Types: Durations and UTC Timestamps
//!
//! Parsers for the three time-bearing packet fields and for the operator's
//! tolerance flags.
//!
//! ## Durations
//!
//! [`TtlDuration`] accepts `<positive-integer><unit>` where the unit is one of
//! `s`, `m`, `h`, `d` (case-insensitive), with optional surrounding
//! whitespace. A day is exactly 86 400 seconds. The parsed value keeps its
//! original magnitude and unit so it renders back as `30m`, not `1800s`.
//!
//! ## Timestamps
//!
//! [`Timestamp`] accepts RFC 3339 date-times that carry an explicit offset
//! (`Z`, `z`, or `±HH:MM`) and normalizes them to UTC. Unlike a canonical
//! digest timestamp, sub-second digits are kept: the consistency check
//! compares `expires_at` against `created_at + ttl` to the nanosecond.
//!
//! Rendering always uses the `Z` suffix and only prints fractional seconds
//! when they are non-zero.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TemporalError;

/// Label used in duration error messages when none is given.
pub const DEFAULT_DURATION_LABEL: &str = "ttl";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Unit suffix of a simple duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    /// `s`
    Seconds,
    /// `m`
    Minutes,
    /// `h`
    Hours,
    /// `d`, exactly 24 hours.
    Days,
}

impl DurationUnit {
    fn from_suffix(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            's' => Some(Self::Seconds),
            'm' => Some(Self::Minutes),
            'h' => Some(Self::Hours),
            'd' => Some(Self::Days),
            _ => None,
        }
    }

    /// The lowercase suffix character.
    pub fn suffix(self) -> char {
        match self {
            Self::Seconds => 's',
            Self::Minutes => 'm',
            Self::Hours => 'h',
            Self::Days => 'd',
        }
    }

    /// Number of seconds in one unit.
    pub fn seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 3_600,
            Self::Days => 86_400,
        }
    }
}

/// A strictly positive duration expressed as `<n><unit>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TtlDuration {
    magnitude: u64,
    unit: DurationUnit,
    delta: TimeDelta,
}

impl TtlDuration {
    /// Build a duration from a magnitude that is known to fit.
    ///
    /// `u32` magnitudes in any unit stay well inside `TimeDelta`'s range.
    /// A zero magnitude is allowed here; only the string parser enforces
    /// positivity.
    pub fn new(magnitude: u32, unit: DurationUnit) -> Self {
        let secs = i64::from(magnitude) * unit.seconds();
        Self {
            magnitude: u64::from(magnitude),
            unit,
            delta: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Shorthand for `n` seconds.
    pub fn seconds(n: u32) -> Self {
        Self::new(n, DurationUnit::Seconds)
    }

    /// Shorthand for `n` minutes.
    pub fn minutes(n: u32) -> Self {
        Self::new(n, DurationUnit::Minutes)
    }

    /// Parse a duration string, naming `label` in any error message.
    pub fn parse(input: &str, label: &str) -> Result<Self, TemporalError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TemporalError::duration(label, "must be a non-empty string"));
        }

        let grammar = || {
            TemporalError::duration(label, "must match <int><s|m|h|d> (e.g., '30m', '2h')")
        };

        let mut chars = trimmed.chars();
        let unit = chars
            .next_back()
            .and_then(DurationUnit::from_suffix)
            .ok_or_else(grammar)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(grammar());
        }

        let too_large = || TemporalError::duration(label, "is too large");
        let magnitude: u64 = digits.parse().map_err(|_| too_large())?;
        if magnitude == 0 {
            return Err(TemporalError::duration(label, "must be positive"));
        }

        let secs = i64::try_from(magnitude)
            .ok()
            .and_then(|m| m.checked_mul(unit.seconds()))
            .ok_or_else(too_large)?;
        let delta = TimeDelta::try_seconds(secs).ok_or_else(too_large)?;

        Ok(Self {
            magnitude,
            unit,
            delta,
        })
    }

    /// Parse a duration held in a JSON value. Non-string values are rejected.
    pub fn from_json(value: &Value, label: &str) -> Result<Self, TemporalError> {
        match value {
            Value::String(s) => Self::parse(s, label),
            _ => Err(TemporalError::duration(label, "must be a non-empty string")),
        }
    }

    /// The integer as written, without leading zeros.
    pub fn magnitude(&self) -> u64 {
        self.magnitude
    }

    /// The unit as written.
    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    /// The exact elapsed time.
    pub fn as_delta(&self) -> TimeDelta {
        self.delta
    }

    /// The exact elapsed time in floating-point seconds.
    pub fn as_secs_f64(&self) -> f64 {
        delta_secs_f64(self.delta)
    }
}

impl FromStr for TtlDuration {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_DURATION_LABEL)
    }
}

impl fmt::Display for TtlDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

/// Parse a duration string. See [`TtlDuration::parse`].
pub fn parse_duration(input: &str, label: &str) -> Result<TtlDuration, TemporalError> {
    TtlDuration::parse(input, label)
}

/// A UTC timestamp with full sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a `chrono::DateTime<Utc>` as-is.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an RFC 3339 date-time with explicit timezone, converting to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidTimestamp`] if the string is blank,
    /// is not a valid date-time, or has no timezone designator.
    pub fn parse(input: &str) -> Result<Self, TemporalError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(TemporalError::InvalidTimestamp(
                "datetime must be a non-empty string".to_string(),
            ));
        }

        match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Ok(Self(dt.with_timezone(&Utc))),
            Err(e) => {
                let naive = NAIVE_FORMATS
                    .iter()
                    .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok());
                let msg = if naive {
                    "date-time must include timezone (e.g., 'Z' or '+00:00')".to_string()
                } else {
                    format!("invalid date-time format {s:?}: {e}")
                };
                Err(TemporalError::InvalidTimestamp(msg))
            }
        }
    }

    /// Parse a timestamp held in a JSON value. Non-string values are rejected.
    pub fn from_json(value: &Value) -> Result<Self, TemporalError> {
        match value {
            Value::String(s) => Self::parse(s),
            _ => Err(TemporalError::InvalidTimestamp(
                "datetime must be a non-empty string".to_string(),
            )),
        }
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// `self + duration`, or `None` if the result leaves chrono's range.
    pub fn checked_add(&self, duration: &TtlDuration) -> Option<Self> {
        self.0.checked_add_signed(duration.as_delta()).map(Self)
    }

    /// Signed seconds from `earlier` to `self`, including fractions.
    pub fn seconds_since(&self, earlier: &Timestamp) -> f64 {
        delta_secs_f64(self.0.signed_duration_since(earlier.0))
    }

    /// Render as RFC 3339 with `Z` suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl FromStr for Timestamp {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a timestamp string. See [`Timestamp::parse`].
pub fn parse_timestamp(input: &str) -> Result<Timestamp, TemporalError> {
    Timestamp::parse(input)
}

fn delta_secs_f64(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}
