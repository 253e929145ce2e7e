// Audio output status, shared between the controller and the stream error callback

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// No audio output; clicks are dropped
    Unavailable = 0,
    Connected = 1,
    /// Stream reported an error; clicks may be lost
    Error = 2,
    /// Output released at shutdown
    Closed = 3,
}

impl From<u8> for DeviceStatus {
    fn from(value: u8) -> Self {
        match value {
            1 => DeviceStatus::Connected,
            2 => DeviceStatus::Error,
            3 => DeviceStatus::Closed,
            _ => DeviceStatus::Unavailable,
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeviceStatus::Unavailable => "unavailable",
            DeviceStatus::Connected => "connected",
            DeviceStatus::Error => "error",
            DeviceStatus::Closed => "closed",
        };
        f.write_str(text)
    }
}

/// Atomic wrapper so the cpal error callback can flag failures
#[derive(Debug, Clone)]
pub struct AtomicDeviceStatus {
    inner: Arc<AtomicU8>,
}

impl AtomicDeviceStatus {
    pub fn new(status: DeviceStatus) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(status as u8)),
        }
    }

    pub fn get(&self) -> DeviceStatus {
        DeviceStatus::from(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, status: DeviceStatus) {
        self.inner.store(status as u8, Ordering::Relaxed);
    }
}

impl Default for AtomicDeviceStatus {
    fn default() -> Self {
        Self::new(DeviceStatus::Unavailable)
    }
}
