// Metronome controller - Single owner of the metronome state
//
// Both periodic processes (beat clock and practice countdown) are entries in
// one `IntervalTimers` table. The host loop calls `advance()`, which runs every
// due tick to completion one after the other, so a reader calling `view()`
// between two calls always sees whole ticks.

use crate::audio::sink::ClickSink;
use crate::audio::status::DeviceStatus;
use crate::clock::{Clock, IntervalTimers};
use crate::config::MetronomeSettings;
use crate::input::{self, DEFAULT_VOLUME};
use crate::practice::history::SessionLog;
use crate::practice::timer::{PracticeTimer, SessionSnapshot, TimerDuration};
use crate::sequencer::rotator::NumberPair;
use crate::sequencer::scheduler::{BeatScheduler, SchedulerConfig, TickEvent};
use crate::sequencer::tempo::{NoteSubdivision, Tempo};
use chrono::TimeDelta;
use log::{debug, info};
use std::time::Duration;

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct MetronomeView {
    pub playing: bool,
    pub current_beat: u32,
    pub ticks_per_cycle: u32,
    pub tempo: Tempo,
    pub subdivision: NoteSubdivision,
    pub volume: f32,
    pub change_beat: u32,
    pub numbers: [Option<u8>; 2],
    pub displayed_number: Option<u8>,
    pub timer_running: bool,
    /// Remaining time while running, configured length otherwise (`m:ss`)
    pub timer_display: String,
    pub timer_duration: TimerDuration,
    pub can_start_timer: bool,
    pub audio_status: DeviceStatus,
}

pub struct MetronomeController {
    clock: Box<dyn Clock>,
    timers: IntervalTimers,
    scheduler: BeatScheduler,
    numbers: NumberPair,
    practice: PracticeTimer,
    history: SessionLog,
    output: Box<dyn ClickSink>,
    shut_down: bool,
}

impl MetronomeController {
    pub fn new(
        settings: &MetronomeSettings,
        clock: Box<dyn Clock>,
        output: Box<dyn ClickSink>,
    ) -> Self {
        let settings = settings.clone().sanitized();

        let scheduler = BeatScheduler::new(SchedulerConfig {
            tempo: Tempo::new(settings.tempo),
            subdivision: settings.subdivision,
            volume: settings.volume,
            change_beat: settings.change_beat,
        });

        Self {
            clock,
            timers: IntervalTimers::new(),
            scheduler,
            numbers: NumberPair::from_numbers(settings.numbers[0], settings.numbers[1]),
            practice: PracticeTimer::new(TimerDuration::new(
                settings.timer_minutes,
                settings.timer_seconds,
            )),
            history: SessionLog::new(),
            output,
            shut_down: false,
        }
    }

    // ===== Beat clock =====

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Start the beat clock; the first click sounds immediately
    pub fn start(&mut self) -> bool {
        if self.shut_down {
            return false;
        }

        let now = self.clock.now();
        let Some(first) = self.scheduler.start(&mut self.timers, now) else {
            return false;
        };

        let config = self.scheduler.config();
        info!("metronome started: {} ({})", config.tempo, config.subdivision);
        self.apply_tick(first);
        true
    }

    pub fn stop(&mut self) -> bool {
        if !self.scheduler.stop(&mut self.timers) {
            return false;
        }

        self.output.silence();
        info!("metronome stopped");
        true
    }

    /// Set the tempo, clamped to [40, 200]
    pub fn set_tempo(&mut self, bpm: u32) {
        let now = self.clock.now();
        self.scheduler
            .set_tempo(Tempo::new(bpm), &mut self.timers, now);
    }

    /// Set the tempo from the text field
    pub fn set_tempo_text(&mut self, text: &str) {
        let previous = self.scheduler.config().tempo.bpm();
        self.set_tempo(input::parse_tempo(text, Some(previous)));
    }

    pub fn set_subdivision(&mut self, subdivision: NoteSubdivision) {
        let now = self.clock.now();
        self.scheduler
            .set_subdivision(subdivision, &mut self.timers, now);
    }

    pub fn set_volume(&mut self, volume: f32) {
        let previous = self.scheduler.config().volume;
        self.scheduler
            .set_volume(input::sanitize_volume(volume, previous));
    }

    pub fn set_change_beat(&mut self, beat: u32) {
        self.scheduler.set_change_beat(beat);
    }

    pub fn select_number(&mut self, number: u8) {
        self.numbers.select_number(number);
    }

    // ===== Practice timer =====

    pub fn set_timer_duration(&mut self, minutes: u32, seconds: u32) {
        self.practice
            .set_duration(TimerDuration::new(minutes, seconds));
    }

    /// Start a practice session with the current tempo and numbers
    pub fn start_timer(&mut self) -> bool {
        if self.shut_down {
            return false;
        }

        let snapshot = SessionSnapshot {
            tempo: self.scheduler.config().tempo,
            numbers_label: self.numbers.label(", "),
        };
        let now = self.clock.now();
        self.practice.start(snapshot, &mut self.timers, now)
    }

    pub fn stop_timer(&mut self) -> bool {
        self.practice.stop(&mut self.timers)
    }

    pub fn reset_timer(&mut self) {
        self.practice.reset(&mut self.timers);
    }

    // ===== Host loop =====

    /// Run every tick that is due. Returns the number of ticks fired.
    pub fn advance(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        while let Some(due) = self.timers.pop_due(now) {
            fired += 1;

            if self.scheduler.owns(due.id) {
                let event = self.scheduler.tick();
                self.apply_tick(event);
            } else if self.practice.owns(due.id) {
                // Stamp the record with the time the deadline was due
                let lag = TimeDelta::from_std(now.saturating_sub(due.at))
                    .unwrap_or(TimeDelta::zero());
                let completed_at = self.clock.wall_time() - lag;

                if let Some(record) = self.practice.tick(&mut self.timers, due.at, completed_at) {
                    self.history.prepend(record);
                }
            } else {
                debug!("dropping orphan timer {:?}", due.id);
                self.timers.clear(due.id);
            }
        }

        fired
    }

    /// Time until the next tick is due, `None` when nothing is armed
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        let deadline = self.timers.next_deadline()?;
        Some(deadline.saturating_sub(self.clock.now()))
    }

    fn apply_tick(&mut self, event: TickEvent) {
        if event.swap_number {
            self.numbers.toggle_displayed();
        }
        self.output.click(event.accent, event.volume);
    }

    // ===== Outputs =====

    pub fn view(&self) -> MetronomeView {
        let config = self.scheduler.config();

        MetronomeView {
            playing: self.scheduler.is_running(),
            current_beat: self.scheduler.current_beat(),
            ticks_per_cycle: config.subdivision.ticks_per_cycle(),
            tempo: config.tempo,
            subdivision: config.subdivision,
            volume: config.volume,
            change_beat: config.change_beat,
            numbers: self.numbers.slots(),
            displayed_number: self.numbers.current_displayed_value(),
            timer_running: self.practice.is_running(),
            timer_display: self.practice.display(),
            timer_duration: self.practice.configured(),
            can_start_timer: self.practice.can_start() && !self.shut_down,
            audio_status: self.output.status(),
        }
    }

    pub fn history(&self) -> &SessionLog {
        &self.history
    }

    pub fn scheduler(&self) -> &BeatScheduler {
        &self.scheduler
    }

    pub fn numbers(&self) -> &NumberPair {
        &self.numbers
    }

    pub fn practice_timer(&self) -> &PracticeTimer {
        &self.practice
    }

    // ===== Teardown =====

    /// Cancel both periodic processes and release the audio output
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        self.scheduler.stop(&mut self.timers);
        self.practice.stop(&mut self.timers);
        self.timers.clear_all();
        self.output.release();
        self.shut_down = true;
        info!("metronome shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Drop for MetronomeController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Default for MetronomeController {
    fn default() -> Self {
        Self::new(
            &MetronomeSettings::default(),
            Box::new(crate::clock::SystemClock::new()),
            Box::new(crate::audio::sink::SilentOutput::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::SilentOutput;
    use crate::clock::ManualClock;

    fn controller(clock: &ManualClock) -> MetronomeController {
        MetronomeController::new(
            &MetronomeSettings::default(),
            Box::new(clock.clone()),
            Box::new(SilentOutput::new()),
        )
    }

    #[test]
    fn test_view_defaults() {
        let clock = ManualClock::new();
        let controller = controller(&clock);
        let view = controller.view();

        assert!(!view.playing);
        assert_eq!(view.tempo.bpm(), 120);
        assert_eq!(view.ticks_per_cycle, 4);
        assert_eq!(view.volume, DEFAULT_VOLUME);
        assert_eq!(view.displayed_number, Some(1));
        assert_eq!(view.timer_display, "5:00");
        assert!(view.can_start_timer);
        assert_eq!(view.audio_status, DeviceStatus::Unavailable);
    }

    #[test]
    fn test_next_tick_delay() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        assert_eq!(controller.time_until_next_tick(), None);

        controller.start();
        clock.advance_ms(200);
        assert_eq!(
            controller.time_until_next_tick(),
            Some(Duration::from_millis(300))
        );
    }

    #[test]
    fn test_tempo_text_fallback() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        controller.set_tempo_text("90");
        assert_eq!(controller.view().tempo.bpm(), 90);

        controller.set_tempo_text("allegro");
        assert_eq!(controller.view().tempo.bpm(), 90);

        controller.set_tempo_text("999");
        assert_eq!(controller.view().tempo.bpm(), 200);
    }

    #[test]
    fn test_nothing_starts_after_shutdown() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        controller.shutdown();
        assert!(!controller.start());
        assert!(!controller.start_timer());
        assert!(!controller.view().can_start_timer);
    }
}
