//! Shared fixtures for the integration tests

#![allow(dead_code)]

use practice_metronome::audio::{ClickSink, DeviceStatus};
use practice_metronome::clock::ManualClock;
use practice_metronome::config::MetronomeSettings;
use practice_metronome::controller::MetronomeController;
use std::cell::RefCell;
use std::rc::Rc;

/// What a `RecordingSink` has seen, shared with the test body
#[derive(Debug, Default)]
pub struct SinkLog {
    pub clicks: Vec<(bool, f32)>,
    pub silences: usize,
    pub releases: usize,
}

/// Click sink that records every call instead of producing sound
pub struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
}

impl RecordingSink {
    pub fn new() -> (Self, Rc<RefCell<SinkLog>>) {
        let log = Rc::new(RefCell::new(SinkLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl ClickSink for RecordingSink {
    fn click(&mut self, accent: bool, volume: f32) {
        self.log.borrow_mut().clicks.push((accent, volume));
    }

    fn silence(&mut self) {
        self.log.borrow_mut().silences += 1;
    }

    fn release(&mut self) {
        self.log.borrow_mut().releases += 1;
    }

    fn status(&self) -> DeviceStatus {
        if self.log.borrow().releases > 0 {
            DeviceStatus::Closed
        } else {
            DeviceStatus::Connected
        }
    }
}

/// Controller on a manual clock with a recording sink
pub fn controller_with(
    settings: &MetronomeSettings,
) -> (MetronomeController, ManualClock, Rc<RefCell<SinkLog>>) {
    let clock = ManualClock::new();
    let (sink, log) = RecordingSink::new();
    let controller = MetronomeController::new(settings, Box::new(clock.clone()), Box::new(sink));
    (controller, clock, log)
}

pub fn controller() -> (MetronomeController, ManualClock, Rc<RefCell<SinkLog>>) {
    controller_with(&MetronomeSettings::default())
}
