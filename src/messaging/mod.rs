// Messaging module - Real-time safe communication with the audio thread

pub mod channels;
pub mod command;
