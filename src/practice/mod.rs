// Practice module - Countdown sessions and their history

pub mod history;
pub mod timer;

pub use history::{PracticeRecord, SessionLog, format_clock};
pub use timer::{PracticeTimer, SessionSnapshot, TimerDuration};
