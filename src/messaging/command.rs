// Click commands - Controller → audio callback

/// Request sent to the audio callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickCommand {
    /// Start a click, cutting any click still ringing
    Trigger { accent: bool, volume: f32 },
    /// Cut the ringing click (metronome stopped)
    Silence,
}
