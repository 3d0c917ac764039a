//! Virtual-time types and the simulation clock.
//!
//! Virtual time is a plain tick counter decoupled from wall-clock time. Only
//! the event scheduler ever writes it; every other component reads it through
//! a shared clock handle (single-writer-of-time invariant).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A virtual-time instant, in ticks since the start of the run.
pub type SimTime = u64;

/// A signed virtual-time delay. Values `<= 0` mean "no pause".
pub type SimDelay = i64;

/// Shared virtual clock advanced exclusively by the scheduler.
#[derive(Clone)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a clock starting at the given virtual time.
    pub fn new(start: SimTime) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Returns the current virtual time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.offset.load(Ordering::Acquire)
    }

    /// Advances the clock to an absolute instant. Never moves backwards.
    #[inline]
    pub fn advance_to(&self, at: SimTime) {
        self.offset.fetch_max(at, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_initial_value() {
        let clock = VirtualClock::new(100);
        assert_eq!(clock.now(), 100);
    }

    #[test]
    fn test_clock_advances_to_absolute_time() {
        let clock = VirtualClock::new(0);
        clock.advance_to(500);
        assert_eq!(clock.now(), 500);
        clock.advance_to(750);
        assert_eq!(clock.now(), 750);
    }

    #[test]
    fn never_moves_backwards() {
        let clock = VirtualClock::new(0);
        clock.advance_to(500);
        clock.advance_to(200);
        assert_eq!(clock.now(), 500);
    }

    #[test]
    fn handles_are_shared() {
        let clock = VirtualClock::new(0);
        let reader = clock.clone();
        clock.advance_to(42);
        assert_eq!(reader.now(), 42);
    }
}
