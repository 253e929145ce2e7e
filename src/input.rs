// Input parsing - Turns raw field text and slider values into valid settings
//
// Nothing here fails: out-of-range numbers are clamped and unreadable text
// falls back to a known good value.

use crate::practice::timer::{MAX_MINUTES, MAX_SECONDS};
use crate::sequencer::tempo::{DEFAULT_BPM, MAX_BPM, MIN_BPM};

pub const DEFAULT_VOLUME: f32 = 0.7;
/// Granularity of the volume control
pub const VOLUME_STEP: f32 = 0.1;

/// Leading integer of a field, ignoring trailing garbage ("12abc" → 12)
///
/// Values too large for i64 saturate.
pub fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_to(value: i64, min: u32, max: u32) -> u32 {
    value.clamp(i64::from(min), i64::from(max)) as u32
}

/// Tempo field: numbers clamp to [40, 200], text falls back to `previous`
/// (or 120 when there is no previous value)
pub fn parse_tempo(text: &str, previous: Option<u32>) -> u32 {
    match parse_leading_integer(text) {
        Some(value) => clamp_to(value, MIN_BPM, MAX_BPM),
        None => previous.unwrap_or(DEFAULT_BPM).clamp(MIN_BPM, MAX_BPM),
    }
}

/// Timer minutes field, unreadable text counts as 0
pub fn parse_timer_minutes(text: &str) -> u32 {
    parse_leading_integer(text).map_or(0, |value| clamp_to(value, 0, MAX_MINUTES))
}

/// Timer seconds field, unreadable text counts as 0
pub fn parse_timer_seconds(text: &str) -> u32 {
    parse_leading_integer(text).map_or(0, |value| clamp_to(value, 0, MAX_SECONDS))
}

/// Clamp a volume to [0, 1] on the 0.1 grid, keeping `previous` for NaN
pub fn sanitize_volume(volume: f32, previous: f32) -> f32 {
    if !volume.is_finite() {
        return previous;
    }

    let stepped = (volume.clamp(0.0, 1.0) / VOLUME_STEP).round() * VOLUME_STEP;
    stepped.clamp(0.0, 1.0)
}
