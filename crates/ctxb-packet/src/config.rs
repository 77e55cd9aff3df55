//! Caller-supplied validation settings.

use chrono::{DateTime, Utc};
use ctxb_core::{Timestamp, TtlDuration};

/// Default clock-skew tolerance, as accepted by the duration parser.
pub const DEFAULT_CLOCK_SKEW: &str = "60s";

/// Default allowance for `created_at` ahead of "now".
pub const DEFAULT_ALLOW_FUTURE_CREATED_AT: &str = "5m";

/// Time inputs for one validation run.
///
/// `now_utc` is always injected so runs are reproducible; nothing in the
/// validation path reads the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// The validator's notion of the current instant.
    pub now_utc: Timestamp,
    /// Tolerance for producer/validator clock disagreement.
    pub clock_skew: TtlDuration,
    /// How far `created_at` may lie ahead of `now_utc`.
    pub allow_future_created_at: TtlDuration,
}

impl ValidationConfig {
    /// Settings for `now` with the default tolerances (`60s` skew, `5m` future allowance).
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now_utc: Timestamp::from_utc(now),
            clock_skew: TtlDuration::seconds(60),
            allow_future_created_at: TtlDuration::minutes(5),
        }
    }

    pub fn with_clock_skew(mut self, clock_skew: TtlDuration) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    pub fn with_allow_future_created_at(mut self, allowance: TtlDuration) -> Self {
        self.allow_future_created_at = allowance;
        self
    }
}
