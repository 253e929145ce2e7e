// Settings - Initial metronome configuration read from a RON file
//
// The file is optional and only read at startup. Every value goes through the
// same clamping as user input, so a hand-edited file can not put the
// metronome in an invalid state.

use crate::error::ConfigError;
use crate::input::{DEFAULT_VOLUME, sanitize_volume};
use crate::practice::timer::TimerDuration;
use crate::sequencer::scheduler::clamp_change_beat;
use crate::sequencer::tempo::{DEFAULT_BPM, NoteSubdivision, Tempo};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "practice_metronome";
const FILE_NAME: &str = "settings.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetronomeSettings {
    pub tempo: u32,
    pub subdivision: NoteSubdivision,
    pub volume: f32,
    /// Practice numbers (1 to 25); invalid entries leave their slot empty
    pub numbers: [u8; 2],
    pub change_beat: u32,
    pub timer_minutes: u32,
    pub timer_seconds: u32,
}

impl Default for MetronomeSettings {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_BPM,
            subdivision: NoteSubdivision::Quarter,
            volume: DEFAULT_VOLUME,
            numbers: [1, 2],
            change_beat: 0,
            timer_minutes: 5,
            timer_seconds: 0,
        }
    }
}

impl MetronomeSettings {
    /// `<config dir>/practice_metronome/settings.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: Self = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(settings.sanitized())
    }

    /// Settings from the default location, or defaults when absent or invalid
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            debug!("no config directory, using default settings");
            return Self::default();
        };

        if !path.exists() {
            debug!("no settings file at {}", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                warn!("{err}, using default settings");
                Self::default()
            }
        }
    }

    /// Clamp every field into its valid range
    pub fn sanitized(self) -> Self {
        let timer = TimerDuration::new(self.timer_minutes, self.timer_seconds);

        Self {
            tempo: Tempo::new(self.tempo).bpm(),
            volume: sanitize_volume(self.volume, DEFAULT_VOLUME),
            change_beat: clamp_change_beat(self.change_beat, self.subdivision),
            timer_minutes: timer.minutes(),
            timer_seconds: timer.seconds(),
            ..self
        }
    }
}
