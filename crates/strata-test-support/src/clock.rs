//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, TimeZone, Utc};
use strata_core::context::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock pinned to 2026-01-15T10:00:00Z, the timestamp shared by the
    /// workspace's tests.
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp is a valid UTC instant.
    #[must_use]
    pub fn standard() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
