//! This module provides functions for analyzing transition tables to detect common mistakes
//! before execution: a missing start state, transitions into states that do not exist,
//! states that can never be entered, and entries under the halt state.
//!
//! Findings do not prevent a run. The machine reports the same problems as failures when it
//! actually reaches them.

use crate::table::TransitionTable;
use crate::types::{MachineConfig, TuringMachineError};
use std::collections::{BTreeSet, HashSet};

/// Represents the issues that can be found in a transition table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The start state has no entries, so every run fails on its first step.
    MissingStartState(String),
    /// Transitions lead to states that have no entries and are not the halt state.
    UndefinedNextStates(Vec<String>),
    /// States with entries that cannot be reached from the start state.
    UnreachableStates(Vec<String>),
    /// The halt state has entries; they never fire because reaching it ends the run.
    HaltStateHasTransitions(String),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::MissingStartState(state) => TuringMachineError::ValidationError(
                format!("Start state {} has no transitions", state),
            ),
            AnalysisError::UndefinedNextStates(transitions) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", transitions),
            ),
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {:?}", states),
            ),
            AnalysisError::HaltStateHasTransitions(state) => TuringMachineError::ValidationError(
                format!("Halt state {} has transitions that can never fire", state),
            ),
        }
    }
}

/// Analyzes a table and returns every finding, in a fixed order.
///
/// # Arguments
///
/// * `table` - The table to analyze.
/// * `config` - Supplies the start and halt state identifiers.
pub fn analyze(table: &TransitionTable, config: &MachineConfig) -> Vec<AnalysisError> {
    [
        check_start_state,
        check_undefined_next_states,
        check_unreachable_states,
        check_halt_state,
    ]
    .iter()
    .filter_map(|f| f(table, config).err())
    .collect()
}

/// Returns the first finding of `analyze` as a `ValidationError`.
pub fn validate(table: &TransitionTable, config: &MachineConfig) -> Result<(), TuringMachineError> {
    match analyze(table, config).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Checks whether the start state is defined in the table.
fn check_start_state(table: &TransitionTable, config: &MachineConfig) -> Result<(), AnalysisError> {
    if table.contains_state(&config.start_state) || config.start_state == config.halt_state {
        return Ok(());
    }

    Err(AnalysisError::MissingStartState(config.start_state.clone()))
}

/// Checks that every `next_state` is either a state with entries or the halt state.
///
/// Each offending transition is listed as `state[symbol] -> next_state`.
fn check_undefined_next_states(
    table: &TransitionTable,
    config: &MachineConfig,
) -> Result<(), AnalysisError> {
    let undefined: BTreeSet<String> = table
        .transitions()
        .filter(|(_, _, t)| {
            t.next_state != config.halt_state && !table.contains_state(&t.next_state)
        })
        .map(|(state, symbol, t)| format!("{}[{}] -> {}", state, symbol, t.next_state))
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedNextStates(
            undefined.into_iter().collect(),
        ));
    }

    Ok(())
}

/// Checks for states that cannot be reached from the start state, using a depth-first
/// traversal over next states.
fn check_unreachable_states(
    table: &TransitionTable,
    config: &MachineConfig,
) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![config.start_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        if let Some(transitions) = table.transitions_from(state) {
            for transition in transitions.values() {
                if !visited.contains(transition.next_state.as_str()) {
                    queue.push(transition.next_state.as_str());
                }
            }
        }
    }

    let mut unreachable: Vec<String> = table
        .states()
        .filter(|state| !visited.contains(state))
        .map(str::to_string)
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

fn check_halt_state(table: &TransitionTable, config: &MachineConfig) -> Result<(), AnalysisError> {
    if table.contains_state(&config.halt_state) {
        return Err(AnalysisError::HaltStateHasTransitions(
            config.halt_state.clone(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;

    fn analyze_default(rules: &str) -> Vec<AnalysisError> {
        analyze(&parse_table(rules).unwrap(), &MachineConfig::default())
    }

    #[test]
    fn test_clean_table() {
        assert!(analyze_default("q0,1,R,q0\nq0,#,1,h").is_empty());
    }

    #[test]
    fn test_missing_start_state() {
        let errors = analyze_default("q1,1,R,h");
        assert!(errors.contains(&AnalysisError::MissingStartState("q0".to_string())));
    }

    #[test]
    fn test_undefined_next_states() {
        let errors = analyze_default("q0,a,R,q3\nq0,b,L,q4\nq0,c,R,h");
        assert_eq!(
            errors,
            vec![AnalysisError::UndefinedNextStates(vec![
                "q0[a] -> q3".to_string(),
                "q0[b] -> q4".to_string(),
            ])]
        );
    }

    #[test]
    fn test_unreachable_states() {
        let errors = analyze_default("q0,a,R,h\nq2,a,R,q1\nq1,a,R,q2");
        assert_eq!(
            errors,
            vec![AnalysisError::UnreachableStates(vec![
                "q1".to_string(),
                "q2".to_string(),
            ])]
        );
    }

    #[test]
    fn test_halt_state_with_transitions() {
        let errors = analyze_default("q0,a,R,h\nh,a,R,q0");
        assert_eq!(
            errors,
            vec![AnalysisError::HaltStateHasTransitions("h".to_string())]
        );
    }

    #[test]
    fn test_validate_returns_first_finding() {
        let table = parse_table("q1,a,R,q9").unwrap();
        let result = validate(&table, &MachineConfig::default());

        match result {
            Err(TuringMachineError::ValidationError(msg)) => {
                assert_eq!(msg, "Start state q0 has no transitions");
            }
            other => panic!("Expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_identifiers() {
        let table = parse_table("start,a,R,accept").unwrap();
        let config = MachineConfig {
            start_state: "start".to_string(),
            halt_state: "accept".to_string(),
            ..MachineConfig::default()
        };
        assert!(analyze(&table, &config).is_empty());
    }
}
