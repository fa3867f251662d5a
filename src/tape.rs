//! This module defines the `Tape`, the machine's unbounded read/write storage.
//!
//! The tape is kept as two stacks split around the head. `left` holds the cells left of the
//! head with the nearest cell on top, `right` holds the head cell and everything to its right,
//! again nearest on top. Shifting moves one cell between the stacks and materializes a blank
//! cell when a stack runs dry, so every move is O(1) amortized and the tape never runs out.

use crate::types::{Direction, Symbol, TuringMachineError, INPUT_BLANK_SYMBOL};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape<S> {
    blank: S,
    left: Vec<S>,
    /// Never empty; the last element is the cell under the head.
    right: Vec<S>,
}

impl<S: Symbol> Tape<S> {
    /// Creates a tape holding a single blank cell.
    pub fn new(blank: S) -> Self {
        Self {
            blank,
            left: Vec::new(),
            right: vec![blank],
        }
    }

    /// Creates a tape from the given cells with the head on the leftmost one.
    /// An empty input yields a single blank cell.
    pub fn from_symbols<I>(blank: S, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut right: Vec<S> = cells.into_iter().collect();
        right.reverse();
        if right.is_empty() {
            right.push(blank);
        }

        Self {
            blank,
            left: Vec::new(),
            right,
        }
    }

    /// Creates a tape from the given cells with the head on cell `head`.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidHead)` if `head` is outside a non-empty input,
    ///   or non-zero for an empty one.
    pub fn with_head<I>(blank: S, cells: I, head: usize) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = S>,
    {
        let mut left: Vec<S> = cells.into_iter().collect();
        let len = left.len();

        if head >= len.max(1) {
            return Err(TuringMachineError::InvalidHead { head, len });
        }

        let mut right = left.split_off(head.min(len));
        right.reverse();
        if right.is_empty() {
            right.push(blank);
        }

        Ok(Self { blank, left, right })
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> S {
        self.right.last().copied().unwrap_or(self.blank)
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: S) {
        match self.right.last_mut() {
            Some(cell) => *cell = symbol,
            None => self.right.push(symbol),
        }
    }

    /// Moves the head one cell, materializing a blank cell when it walks off either end.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let cell = self.left.pop().unwrap_or(self.blank);
                self.right.push(cell);
            }
            Direction::Right => {
                if let Some(cell) = self.right.pop() {
                    self.left.push(cell);
                }
                if self.right.is_empty() {
                    self.right.push(self.blank);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Returns the head position as an index into the materialized cells.
    pub fn head(&self) -> usize {
        self.left.len()
    }

    /// Returns the number of materialized cells. Always at least one.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// A tape always holds the head cell, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn blank(&self) -> S {
        self.blank
    }

    /// Returns the materialized cells left to right.
    pub fn cells(&self) -> Vec<S> {
        self.left
            .iter()
            .chain(self.right.iter().rev())
            .copied()
            .collect()
    }

    /// Captures the materialized cells and the head position.
    pub fn snapshot(&self) -> TapeSnapshot<S> {
        TapeSnapshot {
            cells: self.cells(),
            head: self.head(),
        }
    }
}

impl Tape<char> {
    /// Creates a character tape from an input string, head on the first character.
    /// `INPUT_BLANK_SYMBOL` in the input stands for the blank symbol.
    pub fn from_input(blank: char, input: &str) -> Self {
        Self::from_symbols(
            blank,
            input
                .chars()
                .map(|c| if c == INPUT_BLANK_SYMBOL { blank } else { c }),
        )
    }
}

/// The materialized cells of a tape, left to right, with the head index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeSnapshot<S> {
    pub cells: Vec<S>,
    pub head: usize,
}

impl<S: Symbol> TapeSnapshot<S> {
    /// Returns the symbol under the head.
    pub fn head_symbol(&self) -> Option<S> {
        self.cells.get(self.head).copied()
    }

    /// Drops blank cells at both ends, keeping the head cell, and shifts `head` to match.
    /// A snapshot whose head is not on a cell is returned unchanged.
    pub fn trimmed(&self, blank: S) -> Self {
        if self.head >= self.cells.len() {
            return self.clone();
        }

        let start = self
            .cells
            .iter()
            .position(|&c| c != blank)
            .unwrap_or(self.head)
            .min(self.head);
        let end = self
            .cells
            .iter()
            .rposition(|&c| c != blank)
            .unwrap_or(self.head)
            .max(self.head);

        match self.cells.get(start..=end) {
            Some(cells) => Self {
                cells: cells.to_vec(),
                head: self.head - start,
            },
            None => self.clone(),
        }
    }

    /// Renders the cells with `render`, bracketing the head cell.
    pub fn render<F>(&self, render: F) -> String
    where
        F: Fn(S) -> String,
    {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| {
                if i == self.head {
                    format!("[{}]", render(cell))
                } else {
                    render(cell)
                }
            })
            .collect()
    }
}

impl<S: Symbol + fmt::Display> fmt::Display for TapeSnapshot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|c| c.to_string()))
    }
}
