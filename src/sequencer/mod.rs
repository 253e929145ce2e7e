// Sequencer module - Tempo model, beat clock and practice number rotation

pub mod rotator;
pub mod scheduler;
pub mod tempo;

pub use rotator::NumberPair;
pub use scheduler::{BeatScheduler, SchedulerConfig, TickEvent};
pub use tempo::{NoteSubdivision, Tempo, interval_ms};
