//! This module provides the `TransitionTable`, the finite control of a machine.
//!
//! The table maps a control state to the transitions defined for each symbol read in that state.
//! It may be incomplete: a missing `(state, symbol)` entry is a valid value that the machine
//! reports when it is reached, not a construction error.

use crate::types::{Action, Transition};
use std::collections::HashMap;
use tracing::debug;

/// A single row of a rule file: `<state>,<symbol>,<action>,<next_state>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub state: String,
    pub symbol: char,
    pub action: Action,
    pub next_state: String,
}

/// The finite control of a single-tape Turing machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    rules: HashMap<String, HashMap<char, Transition>>,
}

impl TransitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table by inserting the records in order.
    ///
    /// A later record for the same `(state, symbol)` replaces an earlier one.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RuleRecord>,
    {
        let mut table = Self::new();
        for record in records {
            table.insert(record.state, record.symbol, record.action, record.next_state);
        }

        debug!(
            states = table.state_count(),
            transitions = table.transition_count(),
            "built transition table"
        );

        table
    }

    /// Adds the entry for `(state, symbol)`, replacing any existing one.
    pub fn insert(
        &mut self,
        state: impl Into<String>,
        symbol: char,
        action: Action,
        next_state: impl Into<String>,
    ) {
        self.rules.entry(state.into()).or_default().insert(
            symbol,
            Transition {
                action,
                next_state: next_state.into(),
            },
        );
    }

    /// Returns the transition for `(state, symbol)`, if one is defined.
    pub fn lookup(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.rules.get(state)?.get(&symbol)
    }

    /// Returns every transition defined from `state`, keyed by the symbol read.
    ///
    /// `None` means the state has no entries at all, which the machine reports differently
    /// from a known state that lacks an entry for one symbol.
    pub fn transitions_from(&self, state: &str) -> Option<&HashMap<char, Transition>> {
        self.rules.get(state)
    }

    /// Checks whether `state` has at least one entry.
    pub fn contains_state(&self, state: &str) -> bool {
        self.rules.contains_key(state)
    }

    /// Iterates over the states that have entries, each exactly once, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Iterates over every `(state, symbol, transition)` triple in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, char, &Transition)> {
        self.rules.iter().flat_map(|(state, transitions)| {
            transitions
                .iter()
                .map(move |(&symbol, transition)| (state.as_str(), symbol, transition))
        })
    }

    /// Returns the number of states with entries.
    pub fn state_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the total number of entries.
    pub fn transition_count(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builds a `TransitionTable` from rule records, in record order.
pub fn build_table<I>(records: I) -> TransitionTable
where
    I: IntoIterator<Item = RuleRecord>,
{
    TransitionTable::build(records)
}
