//! Test-only helpers.

#![cfg(test)]

use std::cell::Cell;

use crate::time::TimeSource;

/// A clock that only moves when told to.
///
/// Single-threaded by construction (`Cell`), which is all the unit tests need.
#[derive(Debug)]
pub struct FixedTimeSource {
    /// Current time in seconds since Unix epoch.
    current_secs: Cell<i64>,
}

impl FixedTimeSource {
    /// Create a clock pinned to `now_secs`.
    #[must_use]
    pub const fn new(now_secs: i64) -> Self {
        Self {
            current_secs: Cell::new(now_secs),
        }
    }

    /// Create a clock at `1_700_000_000` (November 2023).
    #[must_use]
    pub const fn default_start() -> Self {
        Self::new(1_700_000_000)
    }

    /// Advance time by `secs`, saturating on overflow.
    pub fn advance(&self, secs: i64) {
        let current = self.current_secs.get();
        self.current_secs.set(current.saturating_add(secs));
    }

    /// Set the current time to a specific value.
    pub fn set(&self, now_secs: i64) {
        self.current_secs.set(now_secs);
    }
}

impl TimeSource for FixedTimeSource {
    fn now_secs(&self) -> i64 {
        self.current_secs.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_time_source_moves_only_when_told() {
        let time = FixedTimeSource::new(1000);
        assert_eq!(time.now_secs(), 1000);
        assert_eq!(time.now_secs(), 1000);

        time.advance(100);
        assert_eq!(time.now_secs(), 1100);

        time.set(50);
        assert_eq!(time.now_secs(), 50);
    }

    #[test]
    fn test_advance_saturates() {
        let time = FixedTimeSource::new(i64::MAX - 1);
        time.advance(10);
        assert_eq!(time.now_secs(), i64::MAX);
    }
}
