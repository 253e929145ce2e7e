// Session history - Completed practice sessions, most recent first

use crate::sequencer::tempo::Tempo;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use uuid::Uuid;

/// Summary of one naturally expired countdown
///
/// Records are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeRecord {
    id: Uuid,
    duration_seconds: u64,
    tempo: Tempo,
    numbers_label: String,
    completed_at: DateTime<Local>,
}

impl PracticeRecord {
    pub fn new(
        duration_seconds: u64,
        tempo: Tempo,
        numbers_label: String,
        completed_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            duration_seconds,
            tempo,
            numbers_label,
            completed_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// Tempo active when the session started
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Numbers selected when the session started
    pub fn numbers_label(&self) -> &str {
        &self.numbers_label
    }

    pub fn completed_at(&self) -> DateTime<Local> {
        self.completed_at
    }

    /// Duration as `m:ss`
    pub fn formatted_duration(&self) -> String {
        format_clock(self.duration_seconds)
    }

    /// Completion time as `HH:MM`
    pub fn time_of_day(&self) -> String {
        self.completed_at.format("%H:%M").to_string()
    }
}

/// Append-only list of practice records, newest at the head
#[derive(Debug, Default)]
pub struct SessionLog {
    records: VecDeque<PracticeRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend(&mut self, record: PracticeRecord) {
        self.records.push_front(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&PracticeRecord> {
        self.records.front()
    }

    /// Records, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &PracticeRecord> {
        self.records.iter()
    }
}

/// Format seconds as `m:ss` (minutes are not padded)
pub fn format_clock(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
