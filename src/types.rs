//! This module defines the core data structures and types shared by the emulator, including
//! transition actions, execution results, run configuration, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// The blank symbol used to extend the tape when the head moves past its right end.
pub const BLANK_SYMBOL: char = '#';
/// The control state every run starts in.
pub const START_STATE: &str = "q0";
/// The reserved control state that ends a run successfully.
pub const HALT_STATE: &str = "h";

/// What a transition does to the tape.
///
/// In rule files the action field is either `L`, `R`, or a single replacement character.
/// Because `L` and `R` always mean a head move, a machine cannot write those two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Move the head one cell to the left.
    MoveLeft,
    /// Move the head one cell to the right.
    MoveRight,
    /// Overwrite the cell under the head, leaving the head in place.
    Write(char),
}

impl FromStr for Action {
    type Err = TuringMachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some('L'), None) => Ok(Action::MoveLeft),
            (Some('R'), None) => Ok(Action::MoveRight),
            (Some(symbol), None) => Ok(Action::Write(symbol)),
            _ => Err(TuringMachineError::ValidationError(format!(
                "Action must be L, R or a single symbol, found {s:?}"
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveLeft => f.write_str("L"),
            Action::MoveRight => f.write_str("R"),
            Action::Write(symbol) => write!(f, "{symbol}"),
        }
    }
}

/// The right-hand side of a table entry: what to do and where to go next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The action applied to the tape.
    pub action: Action,
    /// The control state the machine enters after the action.
    pub next_state: String,
}

/// Run configuration of the emulator.
///
/// The defaults are the conventional identifiers (`q0`, `h`, `#`) and no step bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// The state a run starts in.
    pub start_state: String,
    /// The state that ends a run successfully.
    pub halt_state: String,
    /// The symbol used to extend the tape to the right.
    pub blank: char,
    /// Fail with `StepLimitExceeded` after this many steps without halting.
    pub max_steps: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            start_state: START_STATE.to_string(),
            halt_state: HALT_STATE.to_string(),
            blank: BLANK_SYMBOL,
            max_steps: None,
        }
    }
}

impl MachineConfig {
    /// Returns a copy of this configuration bounded to `max_steps` steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a step and has not reached a terminal state.
    Continue,
    /// The machine reached a terminal state.
    Halt(Halt),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// Reached the halt state.
    Ok,

    Err(TuringMachineError),
}

/// Represents the errors that can occur while building, loading, or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The current control state has no entries in the table.
    #[error("no transitions were defined from state {0}")]
    UndefinedState(String),
    /// The current control state has entries, but none for the symbol under the head.
    #[error("no transition was defined from state {state} given {head}")]
    UndefinedTransition {
        state: String,
        symbol: char,
        head: usize,
    },
    /// A left move was attempted from the first cell.
    #[error("turing machine tape ran out")]
    TapeUnderflow,
    /// The configured step bound was reached before halting.
    #[error("machine did not halt within {0} steps")]
    StepLimitExceeded(usize),
    /// Indicates a syntax error in a rule or test case file.
    #[error("Parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a machine that is well-formed but fails a consistency check.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
