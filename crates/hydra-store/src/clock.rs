//! Time sources.
//!
//! Everything that compares against "now" reads it from a [`Clock`], so
//! expiry and cleanup can be tested with a [`ManualClock`].

use std::sync::{Arc, Mutex};

use time::{Duration, OffsetDateTime, UtcOffset};

/// Source of the current instant.
///
/// The offset of the returned value decides which calendar day "today" is.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> OffsetDateTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}

/// Wall clock in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Wall clock reported in `offset`.
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Wall clock in UTC.
    pub fn utc() -> Self {
        Self::new(UtcOffset::UTC)
    }

    /// Wall clock in the local offset, or UTC when it cannot be determined.
    ///
    /// The local offset can only be read reliably while the process is
    /// single-threaded, so call this before starting a runtime.
    pub fn local() -> Self {
        Self::new(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    /// The offset this clock reports in.
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Start the clock at `now`.
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Move forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(datetime!(2026-10-18 23:00:00 UTC));
        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), datetime!(2026-10-19 01:00:00 UTC));

        clock.set(datetime!(2026-01-01 00:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2026-01-01 00:00:00 UTC));
    }

    #[test]
    fn test_system_clock_reports_in_offset() {
        let clock = SystemClock::new(offset!(+5:30));
        assert_eq!(clock.now().offset(), offset!(+5:30));
        assert_eq!(SystemClock::utc().now().offset(), UtcOffset::UTC);
    }
}
