//! Time sources for the animation engine.
//!
//! Every task reads its start time from the same [`Clock`] the frame driver
//! uses, so progress is consistent across tasks within one tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::types::Timestamp;

/// Monotonic millisecond clock.
pub trait Clock: Send {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock for tests and headless hosts.
///
/// Clones share the same time, so a test can keep one handle while the
/// animator owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// A clock reading `0.0`.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(now.to_bits())),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: Timestamp) {
        self.bits.store(now.to_bits(), Ordering::SeqCst);
    }

    /// Move forward by `delta_ms` and return the new time.
    pub fn advance(&self, delta_ms: f64) -> Timestamp {
        let next = self.now() + delta_ms;
        self.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::starting_at(10.0);
        let handle = clock.clone();

        assert_eq!(clock.now(), 10.0);
        assert_eq!(handle.advance(16.5), 26.5);
        assert_eq!(clock.now(), 26.5);

        clock.set(100.0);
        assert_eq!(handle.now(), 100.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
