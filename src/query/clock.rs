//! Time source used when a query needs "now".

/// Wall-clock reading in nanoseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> u64;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        clamp_nanos(chrono::Utc::now().timestamp_nanos_opt())
    }
}

// Pre-epoch readings clamp to 0; None means past year 2262
fn clamp_nanos(nanos: Option<i64>) -> u64 {
    match nanos {
        Some(nanos) => u64::try_from(nanos).unwrap_or(0),
        None => u64::MAX,
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_nanos(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_nanos() > 1_577_836_800_000_000_000);
    }

    #[test]
    fn test_clamp_nanos_edges() {
        assert_eq!(clamp_nanos(Some(-5)), 0);
        assert_eq!(clamp_nanos(Some(42)), 42);
        assert_eq!(clamp_nanos(None), u64::MAX);
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(7).now_nanos(), 7);
    }
}
