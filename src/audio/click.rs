// Click synthesis - Short percussive tones for the beat clock
// Clicks are pre-rendered once per sample rate; playback only copies samples

use crate::messaging::command::ClickCommand;

/// Metronome click type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    /// Accented tick (higher pitch)
    Accent,
    Regular,
}

impl From<bool> for ClickType {
    fn from(accent: bool) -> Self {
        if accent {
            ClickType::Accent
        } else {
            ClickType::Regular
        }
    }
}

/// Pre-rendered click buffers at unit volume
#[derive(Debug, Clone)]
pub struct ClickSound {
    accent_samples: Vec<f32>,
    regular_samples: Vec<f32>,
}

impl ClickSound {
    const CLICK_DURATION_MS: f32 = 100.0;
    const ATTACK_MS: f32 = 10.0;
    const ACCENT_FREQUENCY: f32 = 1000.0;
    const REGULAR_FREQUENCY: f32 = 800.0;
    /// Peak gain at full volume
    const PEAK: f32 = 0.3;
    /// Gain reached at the end of the release
    const FLOOR: f32 = 0.001;

    pub fn new(sample_rate: f32) -> Self {
        let num_samples = ((Self::CLICK_DURATION_MS / 1000.0) * sample_rate) as usize;
        let attack_samples = ((Self::ATTACK_MS / 1000.0) * sample_rate) as usize;

        Self {
            accent_samples: Self::generate_click(
                sample_rate,
                num_samples,
                attack_samples,
                Self::ACCENT_FREQUENCY,
            ),
            regular_samples: Self::generate_click(
                sample_rate,
                num_samples,
                attack_samples,
                Self::REGULAR_FREQUENCY,
            ),
        }
    }

    /// Square wave with a linear attack and an exponential release
    fn generate_click(
        sample_rate: f32,
        num_samples: usize,
        attack_samples: usize,
        frequency: f32,
    ) -> Vec<f32> {
        let release_samples = num_samples.saturating_sub(attack_samples).max(1);
        let release_ratio = Self::FLOOR / Self::PEAK;

        (0..num_samples)
            .map(|i| {
                let envelope = if i < attack_samples {
                    Self::PEAK * i as f32 / attack_samples as f32
                } else {
                    let t = (i - attack_samples) as f32 / release_samples as f32;
                    Self::PEAK * release_ratio.powf(t)
                };

                let cycle_position = (i as f32 * frequency / sample_rate).fract();
                let square = if cycle_position < 0.5 { 1.0 } else { -1.0 };

                square * envelope
            })
            .collect()
    }

    pub fn get_click(&self, click_type: ClickType) -> &[f32] {
        match click_type {
            ClickType::Accent => &self.accent_samples,
            ClickType::Regular => &self.regular_samples,
        }
    }

    /// Duration of a click in samples
    pub fn click_duration(&self) -> usize {
        self.accent_samples.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct ClickPlayback {
    click_type: ClickType,
    position: usize,
    volume: f32,
}

/// Single-voice click player driven from the audio callback
///
/// A new trigger replaces the ringing click so clicks never pile up at high
/// tempo.
#[derive(Debug, Clone)]
pub struct ClickVoice {
    sound: ClickSound,
    current: Option<ClickPlayback>,
}

impl ClickVoice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sound: ClickSound::new(sample_rate),
            current: None,
        }
    }

    pub fn handle(&mut self, command: ClickCommand) {
        match command {
            ClickCommand::Trigger { accent, volume } => self.trigger(accent.into(), volume),
            ClickCommand::Silence => self.silence(),
        }
    }

    pub fn trigger(&mut self, click_type: ClickType, volume: f32) {
        self.current = Some(ClickPlayback {
            click_type,
            position: 0,
            volume: volume.clamp(0.0, 1.0),
        });
    }

    pub fn silence(&mut self) {
        self.current = None;
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Next output sample (0.0 when idle)
    pub fn next_sample(&mut self) -> f32 {
        let Some(playback) = self.current.as_mut() else {
            return 0.0;
        };

        let samples = self.sound.get_click(playback.click_type);
        match samples.get(playback.position) {
            Some(sample) => {
                playback.position += 1;
                sample * playback.volume
            }
            None => {
                self.current = None;
                0.0
            }
        }
    }

    pub fn process_buffer(&mut self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
