// Practice timer - One-second countdown that logs completed sessions
//
// Only a natural expiry produces a record. A manual stop or reset abandons the
// session without a trace.

use super::history::{PracticeRecord, format_clock};
use crate::clock::{IntervalTimers, TimerId};
use crate::sequencer::tempo::Tempo;
use chrono::{DateTime, Local};
use log::info;
use std::fmt;
use std::time::Duration;

pub const MAX_MINUTES: u32 = 60;
pub const MAX_SECONDS: u32 = 59;

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Configured session length, minutes in [0, 60] and seconds in [0, 59]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDuration {
    minutes: u32,
    seconds: u32,
}

impl TimerDuration {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
        }
    }

    pub fn minutes(self) -> u32 {
        self.minutes
    }

    pub fn seconds(self) -> u32 {
        self.seconds
    }

    pub fn total_seconds(self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    pub fn is_zero(self) -> bool {
        self.total_seconds() == 0
    }
}

impl Default for TimerDuration {
    fn default() -> Self {
        Self::new(5, 0)
    }
}

impl fmt::Display for TimerDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// State captured when a session starts
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub tempo: Tempo,
    pub numbers_label: String,
}

#[derive(Debug)]
struct ActiveSession {
    snapshot: SessionSnapshot,
    started_at: Duration,
    timer: TimerId,
}

/// Countdown state machine (Idle / Running, Expired is transient)
#[derive(Debug, Default)]
pub struct PracticeTimer {
    configured: TimerDuration,
    remaining_seconds: u32,
    session: Option<ActiveSession>,
}

impl PracticeTimer {
    pub fn new(configured: TimerDuration) -> Self {
        Self {
            configured,
            ..Self::default()
        }
    }

    pub fn configured(&self) -> TimerDuration {
        self.configured
    }

    /// Set the length of the next session (a running session is unaffected)
    pub fn set_duration(&mut self, duration: TimerDuration) {
        self.configured = duration;
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Whether `start` would begin a session
    pub fn can_start(&self) -> bool {
        !self.is_running() && !self.configured.is_zero()
    }

    pub fn owns(&self, id: TimerId) -> bool {
        self.session.as_ref().is_some_and(|session| session.timer == id)
    }

    /// Remaining time while running, configured length otherwise
    pub fn display(&self) -> String {
        if self.is_running() {
            format_clock(u64::from(self.remaining_seconds))
        } else {
            self.configured.to_string()
        }
    }

    /// Idle → Running
    ///
    /// No-op (returns false) when the configured length is zero or a session
    /// is already running.
    pub fn start(
        &mut self,
        snapshot: SessionSnapshot,
        timers: &mut IntervalTimers,
        now: Duration,
    ) -> bool {
        if !self.can_start() {
            return false;
        }

        self.remaining_seconds = self.configured.total_seconds();
        info!(
            "practice session started: {} at {}",
            self.configured, snapshot.tempo
        );
        self.session = Some(ActiveSession {
            snapshot,
            started_at: now,
            timer: timers.set_interval(COUNTDOWN_PERIOD, now),
        });

        true
    }

    /// One countdown step, fired at deadline `at`
    ///
    /// Returns the record when this step reaches zero.
    pub fn tick(
        &mut self,
        timers: &mut IntervalTimers,
        at: Duration,
        completed_at: DateTime<Local>,
    ) -> Option<PracticeRecord> {
        self.session.as_ref()?;

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        let session = self.session.take()?;
        timers.clear(session.timer);

        let elapsed = at.saturating_sub(session.started_at).as_secs_f64().round() as u64;
        let record = PracticeRecord::new(
            elapsed,
            session.snapshot.tempo,
            session.snapshot.numbers_label,
            completed_at,
        );
        info!(
            "practice session completed: {} at {}",
            record.formatted_duration(),
            record.tempo()
        );

        Some(record)
    }

    /// Running → Idle without a record. Returns false if already idle.
    pub fn stop(&mut self, timers: &mut IntervalTimers) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        timers.clear(session.timer);
        self.remaining_seconds = 0;
        info!("practice session abandoned");
        true
    }

    /// Stop, then clear the remaining time
    pub fn reset(&mut self, timers: &mut IntervalTimers) {
        self.stop(timers);
        self.remaining_seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            tempo: Tempo::new(120),
            numbers_label: "1, 2".to_string(),
        }
    }

    fn run_until(
        timer: &mut PracticeTimer,
        timers: &mut IntervalTimers,
        now: Duration,
    ) -> Vec<PracticeRecord> {
        let mut records = Vec::new();
        while let Some(due) = timers.pop_due(now) {
            assert!(timer.owns(due.id));
            records.extend(timer.tick(timers, due.at, Local::now()));
        }
        records
    }

    #[test]
    fn test_duration_clamps() {
        let duration = TimerDuration::new(90, 75);
        assert_eq!(duration.minutes(), 60);
        assert_eq!(duration.seconds(), 59);
        assert_eq!(TimerDuration::new(0, 5).to_string(), "0:05");
        assert_eq!(TimerDuration::default().to_string(), "5:00");
    }

    #[test]
    fn test_zero_duration_start_is_noop() {
        let mut timer = PracticeTimer::new(TimerDuration::new(0, 0));
        let mut timers = IntervalTimers::new();

        assert!(!timer.can_start());
        assert!(!timer.start(snapshot(), &mut timers, Duration::ZERO));
        assert!(!timer.is_running());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_runs_to_completion() {
        let mut timer = PracticeTimer::new(TimerDuration::new(0, 5));
        let mut timers = IntervalTimers::new();

        assert!(timer.start(snapshot(), &mut timers, Duration::ZERO));
        assert_eq!(timer.remaining_seconds(), 5);
        assert_eq!(timer.display(), "0:05");

        assert!(run_until(&mut timer, &mut timers, Duration::from_secs(3)).is_empty());
        assert_eq!(timer.display(), "0:02");

        let records = run_until(&mut timer, &mut timers, Duration::from_secs(10));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].formatted_duration(), "0:05");
        assert_eq!(records[0].numbers_label(), "1, 2");
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_seconds(), 0);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_stop_produces_no_record() {
        let mut timer = PracticeTimer::new(TimerDuration::new(0, 5));
        let mut timers = IntervalTimers::new();
        timer.start(snapshot(), &mut timers, Duration::ZERO);

        run_until(&mut timer, &mut timers, Duration::from_secs(3));
        assert!(timer.stop(&mut timers));

        assert!(run_until(&mut timer, &mut timers, Duration::from_secs(60)).is_empty());
        assert_eq!(timer.remaining_seconds(), 0);
        assert!(!timer.stop(&mut timers));
    }

    #[test]
    fn test_double_start_is_noop() {
        let mut timer = PracticeTimer::new(TimerDuration::new(1, 0));
        let mut timers = IntervalTimers::new();

        assert!(timer.start(snapshot(), &mut timers, Duration::ZERO));
        run_until(&mut timer, &mut timers, Duration::from_secs(2));
        assert!(!timer.start(snapshot(), &mut timers, Duration::from_secs(2)));

        assert_eq!(timer.remaining_seconds(), 58);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_reset_clears_remaining() {
        let mut timer = PracticeTimer::new(TimerDuration::new(2, 0));
        let mut timers = IntervalTimers::new();
        timer.start(snapshot(), &mut timers, Duration::ZERO);

        timer.reset(&mut timers);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.display(), "2:00");
    }

    #[test]
    fn test_tick_when_idle_is_ignored() {
        let mut timer = PracticeTimer::new(TimerDuration::new(0, 1));
        let mut timers = IntervalTimers::new();

        assert!(timer.tick(&mut timers, Duration::from_secs(1), Local::now()).is_none());
        assert_eq!(timer.remaining_seconds(), 0);
    }
}
