//! Human-readable slot addresses
//!
//! A label is a row letter followed by a 1-based column number: `(0, 0)` is
//! `A1`, `(1, 2)` is `B3`. Rows are limited to the 26 ASCII capitals.

use crate::error::{RankError, Result};
use std::fmt;
use std::str::FromStr;

/// Maximum number of grid rows (one per letter)
pub const MAX_ROWS: usize = 26;

/// Grid coordinate with a letter+number display form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotLabel {
    row: usize,
    col: usize,
}

impl SlotLabel {
    /// Create a label for a 0-based `(row, col)`
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlotLabel` if `row` has no letter.
    pub fn new(row: usize, col: usize) -> Result<Self> {
        if row >= MAX_ROWS {
            return Err(RankError::InvalidSlotLabel(format!(
                "row {} exceeds the {} lettered rows",
                row, MAX_ROWS
            )));
        }
        Ok(SlotLabel { row, col })
    }

    /// Label for a row-major slot index; the grid guarantees `row < MAX_ROWS`
    pub(crate) fn from_index(index: usize, cols: usize) -> Self {
        SlotLabel {
            row: index / cols,
            col: index % cols,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = (b'A' + self.row as u8) as char;
        write!(f, "{}{}", letter, self.col + 1)
    }
}

impl FromStr for SlotLabel {
    type Err = RankError;

    /// Parse `"<letter><number>"`, e.g. `"B3"`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RankError::InvalidSlotLabel(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        if !letter.is_ascii_uppercase() {
            return Err(invalid());
        }

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: usize = digits.parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }

        let row = (letter as u8 - b'A') as usize;
        SlotLabel::new(row, number - 1)
    }
}
