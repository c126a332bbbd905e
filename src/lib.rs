//! This crate provides the core logic for a single-tape Turing machine emulator.
//! It includes modules for parsing rule and test case files, building transition tables,
//! executing machines, batch testing, analyzing tables, and rendering them as diagrams.

pub mod analyzer;
pub mod batch;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod render;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` and `validate` functions and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, validate, AnalysisError};
/// Re-exports the batch testing types and functions.
pub use batch::{run_case, run_cases, BatchSummary, CaseOutcome, CaseReport};
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `TuringMachine` struct and the string-typed `run` entry point.
pub use machine::{run, TuringMachine};
/// Re-exports the parsing functions and `TestCase` from the parser module.
pub use parser::{parse_cases, parse_rules, parse_table, TestCase};
/// Re-exports the DOT renderer.
pub use render::to_dot;
/// Re-exports the transition table and its builder.
pub use table::{build_table, RuleRecord, TransitionTable};
pub use tape::Tape;
/// Re-exports the shared types from the types module.
pub use types::{
    Action, Halt, MachineConfig, Step, Transition, TuringMachineError, BLANK_SYMBOL, HALT_STATE,
    START_STATE,
};
