// Click sink - The triggering contract between the beat clock and audio output

use super::status::DeviceStatus;
use log::debug;

/// Something that can sound a click
///
/// Implementations must never fail loudly: when audio is gone, clicks are
/// dropped and the beat clock keeps running.
pub trait ClickSink {
    /// Sound one click (volume in [0, 1])
    fn click(&mut self, accent: bool, volume: f32);

    /// Cut a click still ringing
    fn silence(&mut self) {}

    /// Release the audio resource. Calling it again must be a no-op.
    fn release(&mut self) {}

    fn status(&self) -> DeviceStatus;
}

/// Sink used when no audio output could be acquired
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentOutput {
    dropped: u64,
}

impl SilentOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clicks dropped so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl ClickSink for SilentOutput {
    fn click(&mut self, accent: bool, volume: f32) {
        self.dropped += 1;
        debug!("click dropped (accent: {accent}, volume: {volume:.1})");
    }

    fn status(&self) -> DeviceStatus {
        DeviceStatus::Unavailable
    }
}
