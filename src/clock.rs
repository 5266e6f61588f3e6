//! Run-wide notion of "now" and the recency cutoff.

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Default recency window in hours.
pub const DEFAULT_RECENCY_HOURS: u32 = 48;

/// Fixed reference instants for one collection run.
///
/// Computed once at run start and handed to every adapter and the
/// aggregator, so a multi-minute run applies a single cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClock {
    now: NaiveDateTime,
    threshold: NaiveDateTime,
}

impl RunClock {
    /// Capture the local wall clock now.
    #[must_use]
    pub fn starting_now(window: TimeDelta) -> Self {
        Self::at(Local::now().naive_local(), window)
    }

    /// Build a clock anchored at an explicit instant.
    #[must_use]
    pub fn at(now: NaiveDateTime, window: TimeDelta) -> Self {
        let threshold = now.checked_sub_signed(window).unwrap_or(NaiveDateTime::MIN);
        Self { now, threshold }
    }

    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Postings at or before this instant are excluded.
    #[must_use]
    pub fn threshold(&self) -> NaiveDateTime {
        self.threshold
    }

    #[must_use]
    pub fn is_recent(&self, posted_at: NaiveDateTime) -> bool {
        posted_at > self.threshold
    }
}
