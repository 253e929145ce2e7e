// Interval timers - Periodic processes sharing one cooperative timeline
//
// The host loop asks for due entries with `pop_due(now)` and dispatches them
// one at a time, so two processes never run at the same moment. An entry that
// falls behind fires once per missed period, in deadline order, which keeps the
// countdown exact even when the host loop stalls.

use std::time::Duration;

/// Smallest period accepted, so a zero period can never spin the loop
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to an armed periodic process
///
/// Handles are never reused: once cleared, an id can not match a later entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// One firing of a periodic process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub id: TimerId,
    /// Deadline this firing was scheduled for
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Interval {
    id: TimerId,
    period: Duration,
    next_due: Duration,
}

/// Table of armed periodic processes
#[derive(Debug, Default)]
pub struct IntervalTimers {
    entries: Vec<Interval>,
    next_id: u64,
}

impl IntervalTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a periodic process; first firing is one period after `now`
    pub fn set_interval(&mut self, period: Duration, now: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        let id = TimerId(self.next_id);
        self.next_id += 1;

        self.entries.push(Interval {
            id,
            period,
            next_due: now + period,
        });

        id
    }

    /// Cancel a periodic process. Returns false if it was not armed.
    ///
    /// After this returns, `pop_due` never yields `id` again.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Cancel every armed process
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn period(&self, id: TimerId) -> Option<Duration> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.period)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest deadline among armed processes
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.next_due).min()
    }

    /// Take the earliest firing due at or before `now`
    ///
    /// Ties go to the process armed first. The entry is re-armed one period
    /// after the deadline it fired for.
    pub fn pop_due(&mut self, now: Duration) -> Option<Due> {
        let entry = self
            .entries
            .iter_mut()
            .filter(|entry| entry.next_due <= now)
            .min_by_key(|entry| (entry.next_due, entry.id))?;

        let due = Due {
            id: entry.id,
            at: entry.next_due,
        };
        entry.next_due += entry.period;

        Some(due)
    }
}
