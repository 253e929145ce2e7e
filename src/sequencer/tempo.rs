// Tempo - Note subdivisions and tick interval computation
// Maps {BPM, subdivision} to a tick period and to the shape of one 4-beat cycle

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const MIN_BPM: u32 = 40;
pub const MAX_BPM: u32 = 200;
pub const DEFAULT_BPM: u32 = 120;

/// Beats in one cycle, before subdivision
const BEATS_PER_CYCLE: u32 = 4;

/// Note value each tick represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteSubdivision {
    #[default]
    Quarter,
    Eighth,
    Sixteenth,
}

/// Fixed timing record of a subdivision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubdivisionShape {
    /// Tick duration relative to a quarter note
    pub multiplier: f64,
    /// Ticks in one 4-beat cycle
    pub ticks_per_cycle: u32,
    /// Accent falls on every tick where `tick % accent_period == 0`
    pub accent_period: u32,
}

impl NoteSubdivision {
    pub const ALL: [NoteSubdivision; 3] = [
        NoteSubdivision::Quarter,
        NoteSubdivision::Eighth,
        NoteSubdivision::Sixteenth,
    ];

    pub fn shape(self) -> SubdivisionShape {
        match self {
            NoteSubdivision::Quarter => SubdivisionShape {
                multiplier: 1.0,
                ticks_per_cycle: 4,
                accent_period: 4,
            },
            NoteSubdivision::Eighth => SubdivisionShape {
                multiplier: 0.5,
                ticks_per_cycle: 8,
                accent_period: 2,
            },
            NoteSubdivision::Sixteenth => SubdivisionShape {
                multiplier: 0.25,
                ticks_per_cycle: 16,
                accent_period: 4,
            },
        }
    }

    pub fn multiplier(self) -> f64 {
        self.shape().multiplier
    }

    pub fn ticks_per_cycle(self) -> u32 {
        self.shape().ticks_per_cycle
    }

    pub fn accent_period(self) -> u32 {
        self.shape().accent_period
    }

    /// Whether a tick count lands on an accent
    pub fn is_accent(self, tick_count: u64) -> bool {
        tick_count % u64::from(self.accent_period()) == 0
    }

    /// Whether a position in the cycle falls on a quarter-note beat
    pub fn is_main_beat(self, beat: u32) -> bool {
        beat % (self.ticks_per_cycle() / BEATS_PER_CYCLE) == 0
    }

    /// Human readable name
    pub fn label(self) -> &'static str {
        match self {
            NoteSubdivision::Quarter => "Quarter Note",
            NoteSubdivision::Eighth => "8th Note",
            NoteSubdivision::Sixteenth => "16th Note",
        }
    }
}

impl fmt::Display for NoteSubdivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tempo in BPM, always within [MIN_BPM, MAX_BPM]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tempo {
    bpm: u32,
}

impl Tempo {
    /// Creates a tempo, clamping `bpm` into the supported range
    pub fn new(bpm: u32) -> Self {
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
        }
    }

    pub fn bpm(self) -> u32 {
        self.bpm
    }

    /// Duration of one quarter note in milliseconds
    pub fn quarter_duration_ms(self) -> f64 {
        60_000.0 / f64::from(self.bpm)
    }

    /// Tick period in milliseconds for the given subdivision
    pub fn interval_ms(self, subdivision: NoteSubdivision) -> f64 {
        self.quarter_duration_ms() * subdivision.multiplier()
    }

    /// Tick period, rounded to the microsecond
    pub fn interval(self, subdivision: NoteSubdivision) -> Duration {
        let micros = (self.interval_ms(subdivision) * 1000.0).round();
        Duration::from_micros(micros as u64)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

/// Tick period in milliseconds: `(60000 / bpm) * multiplier`
pub fn interval_ms(bpm: u32, subdivision: NoteSubdivision) -> f64 {
    Tempo::new(bpm).interval_ms(subdivision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_at_120_is_500ms() {
        assert_eq!(interval_ms(120, NoteSubdivision::Quarter), 500.0);
        assert_eq!(
            Tempo::new(120).interval(NoteSubdivision::Quarter),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_sixteenth_at_200_is_75ms() {
        assert_eq!(interval_ms(200, NoteSubdivision::Sixteenth), 75.0);
        assert_eq!(
            Tempo::new(200).interval(NoteSubdivision::Sixteenth),
            Duration::from_millis(75)
        );
    }

    #[test]
    fn test_interval_strictly_decreasing_in_tempo() {
        for subdivision in NoteSubdivision::ALL {
            for bpm in MIN_BPM..MAX_BPM {
                assert!(
                    interval_ms(bpm + 1, subdivision) < interval_ms(bpm, subdivision),
                    "{subdivision} at {bpm}"
                );
            }
        }
    }

    #[test]
    fn test_finer_subdivisions_are_shorter() {
        for bpm in MIN_BPM..=MAX_BPM {
            let quarter = interval_ms(bpm, NoteSubdivision::Quarter);
            let eighth = interval_ms(bpm, NoteSubdivision::Eighth);
            let sixteenth = interval_ms(bpm, NoteSubdivision::Sixteenth);
            assert!(eighth < quarter);
            assert!(sixteenth < eighth);
        }
    }

    #[test]
    fn test_tempo_is_clamped() {
        assert_eq!(Tempo::new(10).bpm(), MIN_BPM);
        assert_eq!(Tempo::new(500).bpm(), MAX_BPM);
        assert_eq!(Tempo::new(96).bpm(), 96);
        assert_eq!(Tempo::default().bpm(), DEFAULT_BPM);
    }

    #[test]
    fn test_cycles_are_whole_measures() {
        for subdivision in NoteSubdivision::ALL {
            let shape = subdivision.shape();
            assert_eq!(shape.ticks_per_cycle % BEATS_PER_CYCLE, 0);
            assert_eq!(shape.ticks_per_cycle % shape.accent_period, 0);
        }
    }

    #[test]
    fn test_accent_positions() {
        let accents = |subdivision: NoteSubdivision| -> Vec<u64> {
            (0..u64::from(subdivision.ticks_per_cycle()))
                .filter(|&tick| subdivision.is_accent(tick))
                .collect()
        };

        assert_eq!(accents(NoteSubdivision::Quarter), vec![0]);
        assert_eq!(accents(NoteSubdivision::Eighth), vec![0, 2, 4, 6]);
        assert_eq!(accents(NoteSubdivision::Sixteenth), vec![0, 4, 8, 12]);
    }

    #[test]
    fn test_main_beats() {
        assert!((0..4).all(|beat| NoteSubdivision::Quarter.is_main_beat(beat)));
        assert!(NoteSubdivision::Eighth.is_main_beat(6));
        assert!(!NoteSubdivision::Eighth.is_main_beat(7));
        assert!(NoteSubdivision::Sixteenth.is_main_beat(12));
        assert!(!NoteSubdivision::Sixteenth.is_main_beat(13));
    }

    #[test]
    fn test_labels() {
        assert_eq!(NoteSubdivision::Eighth.to_string(), "8th Note");
        assert_eq!(Tempo::new(90).to_string(), "90 BPM");
    }
}
