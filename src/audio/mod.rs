// Audio module - Click synthesis and the cpal output stream

pub mod click;
pub mod engine;
pub mod sink;
pub mod status;

pub use click::{ClickSound, ClickType, ClickVoice};
pub use engine::ClickOutput;
pub use sink::{ClickSink, SilentOutput};
pub use status::{AtomicDeviceStatus, DeviceStatus};
