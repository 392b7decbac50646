//! Source of "now" for conversions called without a base instant.

use chrono::Utc;

/// Supplies the current instant as UTC epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Reads the operating system clock through `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Always reports the same instant. Useful for deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_constant() {
        let clock = FixedClock(1_704_067_200_000);
        assert_eq!(clock.now_millis(), 1_704_067_200_000);
        assert_eq!(clock.now_millis(), clock.now_millis());
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_clock_by_reference() {
        fn read(clock: impl Clock) -> i64 {
            clock.now_millis()
        }
        let clock = FixedClock(42);
        assert_eq!(read(&clock), 42);
    }
}
