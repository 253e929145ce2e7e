// Practice Metronome - Library exports for the binaries and tests

pub mod audio;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod messaging;
pub mod practice;
pub mod sequencer;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::{ClickOutput, ClickSink, DeviceStatus, SilentOutput};
pub use clock::{Clock, IntervalTimers, ManualClock, SystemClock};
pub use config::MetronomeSettings;
pub use controller::{MetronomeController, MetronomeView};
pub use error::{AudioError, ConfigError, MetronomeError};
pub use practice::{PracticeRecord, PracticeTimer, SessionLog, TimerDuration};
pub use sequencer::{BeatScheduler, NoteSubdivision, NumberPair, Tempo, TickEvent, interval_ms};
