// Clock - Time sources for the cooperative scheduler
// Monotonic time drives the periodic processes, wall time stamps practice records

pub mod timers;

pub use timers::{Due, IntervalTimers, TimerId};

use chrono::{DateTime, Local, TimeDelta};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of time for the metronome controller
pub trait Clock {
    /// Monotonic time elapsed since the clock was created
    fn now(&self) -> Duration;

    /// Wall-clock time (used for record timestamps only, never for scheduling)
    fn wall_time(&self) -> DateTime<Local>;
}

/// Clock backed by the OS monotonic and wall clocks
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Hand-driven clock for deterministic tests and offline runs
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    elapsed_nanos: Arc<AtomicU64>,
    wall_origin: DateTime<Local>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Local::now())
    }

    /// Create a clock whose wall time starts at `wall_origin`
    pub fn starting_at(wall_origin: DateTime<Local>) -> Self {
        Self {
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
            wall_origin,
        }
    }

    /// Move time forward
    pub fn advance(&self, delta: Duration) {
        let delta = u64::try_from(delta.as_nanos()).unwrap_or(u64::MAX);
        let current = self.elapsed_nanos.load(Ordering::Relaxed);
        self.elapsed_nanos
            .store(current.saturating_add(delta), Ordering::Relaxed);
    }

    /// Convenience wrapper around `advance`
    pub fn advance_ms(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::Relaxed))
    }

    fn wall_time(&self) -> DateTime<Local> {
        let offset = TimeDelta::from_std(self.now()).unwrap_or(TimeDelta::zero());
        self.wall_origin + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        assert_eq!(clock.now(), Duration::ZERO);

        handle.advance_ms(1500);
        assert_eq!(clock.now(), Duration::from_millis(1500));
    }

    #[test]
    fn test_manual_clock_wall_time_follows_elapsed() {
        let origin = Local::now();
        let clock = ManualClock::starting_at(origin);

        clock.advance(Duration::from_secs(90));
        assert_eq!((clock.wall_time() - origin).num_seconds(), 90);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
