// Error types
//
// The scheduling core itself never fails: bad input is clamped and redundant
// start/stop calls are no-ops. Errors only come from acquiring the audio
// output and from reading the settings file, and both have a fallback.

use std::path::PathBuf;

/// Audio output acquisition errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Audio configuration error: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Error in stream creation: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Error in stream beginning: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Unsupported sample format: {0:?}. Supported formats: F32, I16, U16")]
    UnsupportedFormat(cpal::SampleFormat),
}

/// Settings file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Umbrella error for the binaries
#[derive(Debug, thiserror::Error)]
pub enum MetronomeError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
