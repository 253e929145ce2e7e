// Number rotator - The two practice numbers and which one is on display

use log::debug;

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 25;

/// Two practice number slots plus the displayed index
///
/// A slot is `None` when empty. Selection never leaves both slots empty once
/// one of them holds a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPair {
    slots: [Option<u8>; 2],
    displayed: usize,
}

impl NumberPair {
    /// Build a pair from two candidate numbers
    ///
    /// Out-of-range values are dropped and a duplicate second value is
    /// dropped. Falls back to the default pair when nothing valid is left.
    pub fn from_numbers(first: u8, second: u8) -> Self {
        let first = is_valid_number(first).then_some(first);
        let second = (is_valid_number(second) && Some(second) != first).then_some(second);

        if first.is_none() && second.is_none() {
            return Self::default();
        }

        Self {
            slots: [first, second],
            displayed: 0,
        }
    }

    pub fn slots(&self) -> [Option<u8>; 2] {
        self.slots
    }

    pub fn contains(&self, number: u8) -> bool {
        self.slots.contains(&Some(number))
    }

    pub fn populated(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn displayed_index(&self) -> usize {
        self.displayed
    }

    /// Value in the displayed slot, `None` if that slot is empty
    pub fn current_displayed_value(&self) -> Option<u8> {
        self.slots[self.displayed]
    }

    /// Flip the displayed slot (called at the change beat)
    pub fn toggle_displayed(&mut self) {
        self.displayed = 1 - self.displayed;
    }

    /// Select or deselect a number from the grid
    ///
    /// A number already in a slot is cleared, unless it is the only one left.
    /// A new number goes into the first empty slot, or replaces slot 0 when
    /// both are full. Returns whether the pair changed.
    pub fn select_number(&mut self, number: u8) -> bool {
        if !is_valid_number(number) {
            debug!("ignoring out-of-range number {number}");
            return false;
        }

        if let Some(index) = self.slot_of(number) {
            if self.slots[1 - index].is_none() {
                return false;
            }
            self.slots[index] = None;
            return true;
        }

        let target = self.slots.iter().position(Option::is_none).unwrap_or(0);
        self.slots[target] = Some(number);
        true
    }

    /// Non-empty numbers joined by `separator`
    pub fn label(&self, separator: &str) -> String {
        self.slots
            .iter()
            .flatten()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn slot_of(&self, number: u8) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(number))
    }
}

impl Default for NumberPair {
    fn default() -> Self {
        Self {
            slots: [Some(1), Some(2)],
            displayed: 0,
        }
    }
}

pub fn is_valid_number(number: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&number)
}
