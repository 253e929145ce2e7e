//! Practice timer sessions through the controller

mod common;

use chrono::{Local, TimeZone};
use common::{RecordingSink, controller, controller_with};
use practice_metronome::clock::ManualClock;
use practice_metronome::config::MetronomeSettings;
use practice_metronome::controller::MetronomeController;

fn short_session() -> MetronomeSettings {
    MetronomeSettings {
        timer_minutes: 0,
        timer_seconds: 5,
        ..MetronomeSettings::default()
    }
}

/// Controller whose wall clock starts at 2024-03-01 10:00:00
fn controller_at_ten() -> (MetronomeController, ManualClock) {
    let start = Local
        .with_ymd_and_hms(2024, 3, 1, 10, 0, 0)
        .single()
        .unwrap();
    let clock = ManualClock::starting_at(start);
    let (sink, _log) = RecordingSink::new();
    let controller =
        MetronomeController::new(&short_session(), Box::new(clock.clone()), Box::new(sink));
    (controller, clock)
}

/// A five second session counts down and logs exactly one record
#[test]
fn test_session_runs_to_completion() {
    let (mut controller, clock) = controller_at_ten();

    assert_eq!(controller.view().timer_display, "0:05");
    assert!(controller.start_timer());
    assert!(controller.view().timer_running);
    assert!(!controller.view().can_start_timer);

    for expected in ["0:04", "0:03", "0:02", "0:01"] {
        clock.advance_ms(1000);
        controller.advance();
        assert_eq!(controller.view().timer_display, expected);
    }

    clock.advance_ms(1000);
    controller.advance();

    let view = controller.view();
    assert!(!view.timer_running);
    assert_eq!(view.timer_display, "0:05");
    assert!(view.can_start_timer);

    assert_eq!(controller.history().len(), 1);
    let record = controller.history().latest().unwrap();
    assert_eq!(record.formatted_duration(), "0:05");
    assert_eq!(record.duration_seconds(), 5);
    assert_eq!(record.tempo().bpm(), 120);
    assert_eq!(record.numbers_label(), "1, 2");
    assert_eq!(record.time_of_day(), "10:00");

    // Nothing else fires once the session is over
    clock.advance_ms(10_000);
    assert_eq!(controller.advance(), 0);
    assert_eq!(controller.history().len(), 1);
}

/// The record keeps the tempo and numbers from when the session started
#[test]
fn test_record_uses_start_snapshot() {
    let (mut controller, clock) = controller_at_ten();

    controller.start_timer();
    controller.set_tempo(90);
    controller.select_number(7);

    clock.advance_ms(5000);
    controller.advance();

    let record = controller.history().latest().unwrap();
    assert_eq!(record.tempo().bpm(), 120);
    assert_eq!(record.numbers_label(), "1, 2");
}

/// A late host loop still stamps the record with the expiry time
#[test]
fn test_late_expiry_is_stamped_at_deadline() {
    let (mut controller, clock) = controller_at_ten();

    controller.start_timer();
    clock.advance_ms(125_000);
    assert_eq!(controller.advance(), 5);

    let record = controller.history().latest().unwrap();
    assert_eq!(record.duration_seconds(), 5);
    assert_eq!(record.time_of_day(), "10:00");
}

/// Stopping early abandons the session without a record
#[test]
fn test_stop_early_logs_nothing() {
    let (mut controller, clock, _log) = controller_with(&short_session());

    controller.start_timer();
    clock.advance_ms(3000);
    controller.advance();
    assert_eq!(controller.practice_timer().remaining_seconds(), 2);

    assert!(controller.stop_timer());
    assert!(!controller.view().timer_running);
    assert_eq!(controller.view().timer_display, "0:05");

    clock.advance_ms(5000);
    assert_eq!(controller.advance(), 0);
    assert!(controller.history().is_empty());
    assert!(!controller.stop_timer());
}

/// Reset behaves like stop and clears the remaining time
#[test]
fn test_reset_clears_remaining() {
    let (mut controller, clock, _log) = controller_with(&short_session());

    controller.start_timer();
    clock.advance_ms(2000);
    controller.advance();

    controller.reset_timer();
    assert!(!controller.view().timer_running);
    assert_eq!(controller.practice_timer().remaining_seconds(), 0);
    assert!(controller.history().is_empty());
}

/// A zero-length timer can not start
#[test]
fn test_zero_duration_cannot_start() {
    let (mut controller, _clock, _log) = controller();

    controller.set_timer_duration(0, 0);
    assert!(!controller.view().can_start_timer);
    assert!(!controller.start_timer());
    assert_eq!(controller.view().timer_display, "0:00");
}

/// Duration fields are clamped to 60 minutes and 59 seconds
#[test]
fn test_duration_is_clamped() {
    let (mut controller, _clock, _log) = controller();

    controller.set_timer_duration(99, 75);
    let duration = controller.view().timer_duration;
    assert_eq!(duration.minutes(), 60);
    assert_eq!(duration.seconds(), 59);
    assert_eq!(controller.view().timer_display, "60:59");
}

/// Changing the duration during a session only affects the next one
#[test]
fn test_duration_change_waits_for_next_session() {
    let (mut controller, clock, _log) = controller_with(&short_session());

    controller.start_timer();
    controller.set_timer_duration(1, 0);

    clock.advance_ms(5000);
    controller.advance();
    assert_eq!(controller.history().latest().unwrap().duration_seconds(), 5);
    assert_eq!(controller.view().timer_display, "1:00");
}

/// Completed sessions are listed most recent first
#[test]
fn test_history_is_most_recent_first() {
    let (mut controller, clock, _log) = controller_with(&short_session());

    controller.start_timer();
    clock.advance_ms(5000);
    controller.advance();

    controller.set_timer_duration(0, 2);
    controller.start_timer();
    clock.advance_ms(2000);
    controller.advance();

    let durations: Vec<u64> = controller
        .history()
        .iter()
        .map(|record| record.duration_seconds())
        .collect();
    assert_eq!(durations, vec![2, 5]);
}

/// The beat clock and the countdown run independently
#[test]
fn test_timer_independent_of_beat_clock() {
    let (mut controller, clock, log) = controller_with(&short_session());

    controller.start();
    controller.start_timer();

    clock.advance_ms(2000);
    // Four beats and two countdown steps
    assert_eq!(controller.advance(), 6);

    controller.stop();
    assert!(controller.view().timer_running);

    clock.advance_ms(3000);
    assert_eq!(controller.advance(), 3);
    assert_eq!(controller.history().len(), 1);
    assert_eq!(log.borrow().clicks.len(), 5);

    // Stopping the timer leaves a running beat clock alone
    controller.start();
    controller.start_timer();
    controller.stop_timer();
    assert!(controller.is_playing());
}
