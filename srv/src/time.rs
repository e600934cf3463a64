//! Clock abstraction for token expiry checks.
//!
//! Validation compares a token's `exp` claim against "now". Routing that
//! lookup through a `TimeSource` lets production code use the system clock
//! while tests pin time to a fixed instant.

use std::time::{SystemTime, UNIX_EPOCH};

/// Abstraction over the current wall-clock time.
pub trait TimeSource {
    /// Get the current time in whole seconds since Unix epoch.
    fn now_secs(&self) -> i64;
}

/// Real time source using the system clock.
///
/// This is the default implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_secs(&self) -> i64 {
        // A clock set before 1970 reads as the epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| {
                i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
            })
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_secs(&self) -> i64 {
        (**self).now_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source() {
        let source = SystemTimeSource;
        let t1 = source.now_secs();
        let t2 = source.now_secs();

        // Time should be reasonable (after 2020)
        assert!(t1 > 1_577_836_800); // 2020-01-01 00:00:00 UTC

        // Time should not go backwards
        assert!(t2 >= t1);
    }

    #[test]
    fn test_reference_delegates() {
        let source = SystemTimeSource;
        let by_ref: &dyn TimeSource = &source;
        assert!(by_ref.now_secs() >= source.now_secs() - 1);
    }
}
