// Beat scheduler - Drives the tick clock and the rotating beat counter
//
// The scheduler owns the live configuration. Each tick reads it at fire time,
// so a tempo, subdivision, volume or change-beat edit made between two ticks
// applies from the next tick on. The periodic process itself lives in
// `IntervalTimers`; the scheduler only keeps the handle of its entry.

use super::tempo::{NoteSubdivision, Tempo};
use crate::clock::{IntervalTimers, TimerId};
use log::debug;
use std::time::Duration;

/// Live scheduling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    pub tempo: Tempo,
    pub subdivision: NoteSubdivision,
    /// Click volume (0.0 to 1.0)
    pub volume: f32,
    /// Position in the cycle where the displayed number swaps
    pub change_beat: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tempo: Tempo::default(),
            subdivision: NoteSubdivision::Quarter,
            volume: 0.7,
            change_beat: 0,
        }
    }
}

/// Outcome of one tick, applied by the owner in a single step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    /// Value of the tick counter when this tick fired
    pub tick: u64,
    /// Position in the cycle, in [0, ticks_per_cycle)
    pub beat: u32,
    pub accent: bool,
    /// This tick landed on the change beat
    pub swap_number: bool,
    pub volume: f32,
}

/// Beat clock state machine (Stopped / Running)
#[derive(Debug, Default)]
pub struct BeatScheduler {
    config: SchedulerConfig,
    tick_count: u64,
    current_beat: u32,
    timer: Option<TimerId>,
}

impl BeatScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config: SchedulerConfig {
                volume: config.volume.clamp(0.0, 1.0),
                change_beat: clamp_change_beat(config.change_beat, config.subdivision),
                ..config
            },
            ..Self::default()
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Beat position last published for display
    pub fn current_beat(&self) -> u32 {
        self.current_beat
    }

    /// Current tick period
    pub fn interval(&self) -> Duration {
        self.config.tempo.interval(self.config.subdivision)
    }

    /// Whether `id` is this scheduler's periodic process
    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    /// Stopped → Running
    ///
    /// Resets the counter, fires the first tick synchronously and arms the
    /// periodic process. Returns `None` if already running.
    pub fn start(&mut self, timers: &mut IntervalTimers, now: Duration) -> Option<TickEvent> {
        if self.is_running() {
            return None;
        }

        self.tick_count = 0;
        self.current_beat = 0;

        let first = self.tick();
        self.timer = Some(timers.set_interval(self.interval(), now));
        debug!("beat clock armed at {:?}", self.interval());

        Some(first)
    }

    /// Running → Stopped
    ///
    /// The periodic process is cancelled before this returns. Returns false if
    /// already stopped.
    pub fn stop(&mut self, timers: &mut IntervalTimers) -> bool {
        let Some(id) = self.timer.take() else {
            return false;
        };

        timers.clear(id);
        self.tick_count = 0;
        self.current_beat = 0;
        true
    }

    /// Advance the counter by one tick using the live configuration
    pub fn tick(&mut self) -> TickEvent {
        let subdivision = self.config.subdivision;
        let ticks_per_cycle = u64::from(subdivision.ticks_per_cycle());

        let beat = (self.tick_count % ticks_per_cycle) as u32;
        let event = TickEvent {
            tick: self.tick_count,
            beat,
            accent: subdivision.is_accent(self.tick_count),
            swap_number: beat == self.config.change_beat,
            volume: self.config.volume,
        };

        self.current_beat = beat;
        self.tick_count += 1;

        event
    }

    pub fn set_tempo(&mut self, tempo: Tempo, timers: &mut IntervalTimers, now: Duration) {
        if self.config.tempo == tempo {
            return;
        }

        self.config.tempo = tempo;
        self.rearm(timers, now);
    }

    /// Change the subdivision
    ///
    /// A change beat that no longer fits the new cycle is clamped to its last
    /// position. The tick counter is kept.
    pub fn set_subdivision(
        &mut self,
        subdivision: NoteSubdivision,
        timers: &mut IntervalTimers,
        now: Duration,
    ) {
        if self.config.subdivision == subdivision {
            return;
        }

        self.config.subdivision = subdivision;
        self.config.change_beat = clamp_change_beat(self.config.change_beat, subdivision);
        self.rearm(timers, now);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.config.volume = volume.clamp(0.0, 1.0);
    }

    /// Set the change beat, clamped into the current cycle
    pub fn set_change_beat(&mut self, beat: u32) {
        self.config.change_beat = clamp_change_beat(beat, self.config.subdivision);
    }

    /// Replace the running periodic process with one at the current interval
    fn rearm(&mut self, timers: &mut IntervalTimers, now: Duration) {
        let Some(id) = self.timer else {
            return;
        };

        timers.clear(id);
        self.timer = Some(timers.set_interval(self.interval(), now));
        debug!(
            "beat clock re-armed at {:?} (tick {})",
            self.interval(),
            self.tick_count
        );
    }
}

/// Keep a change beat inside `[0, ticks_per_cycle)`
pub fn clamp_change_beat(beat: u32, subdivision: NoteSubdivision) -> u32 {
    beat.min(subdivision.ticks_per_cycle() - 1)
}
