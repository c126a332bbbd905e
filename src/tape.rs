//! The tape of a single-tape machine: a row of cells that grows to the right on demand.

use crate::types::TuringMachineError;
use std::fmt;

/// A tape and its read/write head.
///
/// The head never moves left of cell 0. It may move one cell past the right end, in which
/// case that cell is filled with the blank symbol the next time it is read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
    blank: char,
}

impl Tape {
    /// Creates a tape holding `input` with the head on the first cell.
    pub fn new(input: &str, blank: char) -> Self {
        Self {
            cells: input.chars().collect(),
            head: 0,
            blank,
        }
    }

    /// Reads the symbol under the head, extending the tape if the head is past its end.
    pub fn read(&mut self) -> char {
        self.extend_to_head();
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: char) {
        self.extend_to_head();
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell to the left.
    ///
    /// Fails with `TapeUnderflow` on the first cell, leaving the tape untouched.
    pub fn move_left(&mut self) -> Result<(), TuringMachineError> {
        self.head = self
            .head
            .checked_sub(1)
            .ok_or(TuringMachineError::TapeUnderflow)?;
        Ok(())
    }

    /// Moves the head one cell to the right. The tape grows lazily on the next access.
    pub fn move_right(&mut self) {
        self.head += 1;
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    // Grow only up to the visited cell.
    fn extend_to_head(&mut self) {
        if self.head >= self.cells.len() {
            self.cells.resize(self.head + 1, self.blank);
        }
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
