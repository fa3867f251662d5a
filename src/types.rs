//! This module defines the core data structures and types shared by the simulator:
//! the symbol and state bounds, head directions, step outcomes, verdicts and error types.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// The default blank symbol used by character tapes.
pub const DEFAULT_BLANK_SYMBOL: char = ' ';
/// A special input symbol used in tape input strings to represent the blank symbol.
pub const INPUT_BLANK_SYMBOL: char = '_';
/// The default maximum number of transitions to apply before giving up on a run.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A tape symbol. Any small copyable, hashable value qualifies: `char`, `u8`,
/// or a caller-defined fieldless enum.
pub trait Symbol: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> Symbol for T {}

/// A machine state. States are cloned once per applied transition.
pub trait State: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> State for T {}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Single letter form, as used when displaying a `TransitionRule`.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

/// The terminal classification of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The machine entered a state of the accept set.
    Accepted,
    /// No transition is defined for the current state and symbol.
    Rejected,
    /// The step limit ran out while the machine still had a transition to apply.
    StepLimitExceeded,
    /// The run was stopped through its cancellation flag.
    Cancelled,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Verdict::Accepted => "accepted",
            Verdict::Rejected => "rejected",
            Verdict::StepLimitExceeded => "step limit exceeded",
            Verdict::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine applied a transition and keeps running.
    Continue,
    /// The machine reached a terminal condition.
    Halt(Verdict),
}

/// Represents the errors that can occur while building a machine or its tape.
///
/// Rejection and step exhaustion are verdicts, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// Two rules share the same (state, symbol) key.
    #[error("Duplicate transition for state {state} and symbol {symbol}")]
    DuplicateTransition { state: String, symbol: String },
    /// A rule or tape references a symbol outside the declared alphabet.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    /// A rule, the accept set or the start state references an undeclared state.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// The initial head position lies outside the initial tape content.
    #[error("Invalid head position {head} for tape of length {len}")]
    InvalidHead { head: usize, len: usize },
    /// Indicates an incomplete definition or an analyzer finding.
    #[error("Machine validation error: {0}")]
    ValidationError(String),
}

impl TuringMachineError {
    pub(crate) fn duplicate<Q: Debug, S: Debug>(state: &Q, symbol: &S) -> Self {
        TuringMachineError::DuplicateTransition {
            state: format!("{:?}", state),
            symbol: format!("{:?}", symbol),
        }
    }

    pub(crate) fn unknown_symbol<S: Debug>(symbol: &S) -> Self {
        TuringMachineError::UnknownSymbol(format!("{:?}", symbol))
    }

    pub(crate) fn unknown_state<Q: Debug>(state: &Q) -> Self {
        TuringMachineError::UnknownState(format!("{:?}", state))
    }
}
