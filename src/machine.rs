//! This module defines the `TuringMachine` struct, which executes a `TransitionTable` against a
//! single tape. It handles the control state, head movements, tape growth, and the
//! classification of each run as halted or failed.

use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{Action, Halt, MachineConfig, Step, Transition, TuringMachineError};
use tracing::{debug, trace};

/// A single run of a Turing machine over one tape.
///
/// The table is borrowed, so any number of runs can share one table. The control state,
/// tape, and head belong to the run alone.
pub struct TuringMachine<'a> {
    table: &'a TransitionTable,
    config: MachineConfig,
    state: String,
    tape: Tape,
    step_count: usize,
}

impl<'a> TuringMachine<'a> {
    /// Creates a machine in the default start state with `input` on the tape.
    pub fn new(table: &'a TransitionTable, input: &str) -> Self {
        Self::with_config(table, input, MachineConfig::default())
    }

    /// Creates a machine using the identifiers, blank symbol, and step bound of `config`.
    pub fn with_config(table: &'a TransitionTable, input: &str, config: MachineConfig) -> Self {
        Self {
            table,
            state: config.start_state.clone(),
            tape: Tape::new(input, config.blank),
            config,
            step_count: 0,
        }
    }

    /// Executes a single step of the machine.
    ///
    /// Reads the symbol under the head, looks up the transition for the current state, applies
    /// its action, and enters the next state.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the step completed and the machine is not in the halt state.
    /// * `Step::Halt(Halt::Ok)` if the machine is (or just entered) the halt state.
    /// * `Step::Halt(Halt::Err(_))` if the step could not be completed.
    pub fn step(&mut self) -> Step {
        if self.is_halted() {
            return Step::Halt(Halt::Ok);
        }

        let symbol = self.tape.read();
        let transition = match self.transition(symbol) {
            Ok(t) => t,
            Err(e) => return self.fail(e),
        };

        trace!(
            step = self.step_count,
            state = %self.state,
            symbol = %symbol,
            head = self.tape.head(),
            action = %transition.action,
            next = %transition.next_state,
            "step"
        );

        match transition.action {
            Action::MoveLeft => {
                if let Err(e) = self.tape.move_left() {
                    return self.fail(e);
                }
            }
            Action::MoveRight => self.tape.move_right(),
            Action::Write(replacement) => self.tape.write(replacement),
        }

        self.state.clone_from(&transition.next_state);
        self.step_count += 1;

        if self.is_halted() {
            debug!(steps = self.step_count, tape = %self.tape, "machine halted");
            Step::Halt(Halt::Ok)
        } else {
            Step::Continue
        }
    }

    /// Runs the machine until it halts or fails.
    ///
    /// Without a step bound in the configuration a machine that never reaches the halt state
    /// runs forever.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` with the final tape contents if the halt state was reached.
    /// * `Err(TuringMachineError)` describing why the run stopped otherwise.
    pub fn run(&mut self) -> Result<String, TuringMachineError> {
        self.run_with(|_| {})
    }

    /// Runs the machine like [`run`](Self::run), calling `on_step` after every completed step.
    pub fn run_with<F>(&mut self, mut on_step: F) -> Result<String, TuringMachineError>
    where
        F: FnMut(&Self),
    {
        loop {
            if let Some(limit) = self.config.max_steps {
                if self.step_count >= limit && !self.is_halted() {
                    debug!(limit, state = %self.state, "step limit reached");
                    return Err(TuringMachineError::StepLimitExceeded(limit));
                }
            }

            let before = self.step_count;
            let step = self.step();
            if self.step_count > before {
                on_step(self);
            }

            match step {
                Step::Continue => continue,
                Step::Halt(Halt::Ok) => return Ok(self.tape.to_string()),
                Step::Halt(Halt::Err(e)) => return Err(e),
            }
        }
    }

    /// Returns the current control state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the current head position.
    pub fn head(&self) -> usize {
        self.tape.head()
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the number of completed steps.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks whether the machine is in the halt state.
    pub fn is_halted(&self) -> bool {
        self.state == self.config.halt_state
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Finds the transition for the current state and `symbol`.
    ///
    /// A state without any entries and a known state without an entry for `symbol` are
    /// reported as different errors.
    fn transition(&self, symbol: char) -> Result<&'a Transition, TuringMachineError> {
        let table: &'a TransitionTable = self.table;

        table
            .transitions_from(&self.state)
            .ok_or_else(|| TuringMachineError::UndefinedState(self.state.clone()))?
            .get(&symbol)
            .ok_or_else(|| TuringMachineError::UndefinedTransition {
                state: self.state.clone(),
                symbol,
                head: self.tape.head(),
            })
    }

    fn fail(&self, error: TuringMachineError) -> Step {
        debug!(steps = self.step_count, state = %self.state, %error, "machine failed");
        Step::Halt(Halt::Err(error))
    }
}

/// Runs `table` against `tape` with the default configuration.
///
/// Returns the final tape on success, or the diagnostic message of the failure.
pub fn run(table: &TransitionTable, tape: &str) -> Result<String, String> {
    TuringMachine::new(table, tape)
        .run()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{build_table, RuleRecord};

    fn table(rows: &[(&str, char, &str, &str)]) -> TransitionTable {
        build_table(rows.iter().map(|&(state, symbol, action, next)| RuleRecord {
            state: state.to_string(),
            symbol,
            action: action.parse().unwrap(),
            next_state: next.to_string(),
        }))
    }

    fn unary_increment() -> TransitionTable {
        table(&[("q0", '1', "R", "q0"), ("q0", '#', "1", "h")])
    }

    #[test]
    fn test_unary_increment() {
        let table = unary_increment();
        assert_eq!(run(&table, "11"), Ok("111".to_string()));
        assert_eq!(run(&table, ""), Ok("1".to_string()));
    }

    #[test]
    fn test_unary_increment_step_by_step() {
        let table = unary_increment();
        let mut machine = TuringMachine::new(&table, "11");

        assert_eq!(machine.state(), "q0");
        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.head(), 2);
        assert_eq!(machine.tape().len(), 2); // Not extended until read

        assert_eq!(machine.step(), Step::Halt(Halt::Ok));
        assert_eq!(machine.state(), "h");
        assert_eq!(machine.step_count(), 3);
        assert_eq!(machine.tape().to_string(), "111");

        // Stepping a halted machine is a no-op
        assert_eq!(machine.step(), Step::Halt(Halt::Ok));
        assert_eq!(machine.step_count(), 3);
    }

    #[test]
    fn test_undefined_transition_reports_head() {
        let table = unary_increment();
        assert_eq!(
            run(&table, "0"),
            Err("no transition was defined from state q0 given 0".to_string())
        );

        let mut machine = TuringMachine::new(&table, "110");
        assert_eq!(
            machine.run(),
            Err(TuringMachineError::UndefinedTransition {
                state: "q0".to_string(),
                symbol: '0',
                head: 2,
            })
        );
    }

    #[test]
    fn test_undefined_state() {
        let table = table(&[("q0", 'a', "R", "q3")]);
        assert_eq!(
            run(&table, "a"),
            Err("no transitions were defined from state q3".to_string())
        );
    }

    #[test]
    fn test_missing_start_state_fails_first_step() {
        let table = table(&[("q1", 'a', "R", "h")]);
        let mut machine = TuringMachine::new(&table, "a");

        assert_eq!(
            machine.step(),
            Step::Halt(Halt::Err(TuringMachineError::UndefinedState(
                "q0".to_string()
            )))
        );
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_left_underflow_does_not_mutate_tape() {
        let table = table(&[("q0", 'a', "L", "q1")]);
        let mut machine = TuringMachine::new(&table, "ab");

        assert_eq!(machine.run(), Err(TuringMachineError::TapeUnderflow));
        assert_eq!(machine.tape().to_string(), "ab");
        assert_eq!(machine.head(), 0);
        assert_eq!(run(&table, "a"), Err("turing machine tape ran out".to_string()));
    }

    #[test]
    fn test_left_move_within_tape() {
        let table = table(&[
            ("q0", 'a', "R", "q1"),
            ("q1", 'b', "L", "q2"),
            ("q2", 'a', "x", "h"),
        ]);
        assert_eq!(run(&table, "ab"), Ok("xb".to_string()));
    }

    #[test]
    fn test_lazy_extension_grows_only_visited_cells() {
        // Walk right over blanks three times, then halt by writing.
        let table = table(&[
            ("q0", '#', "R", "q1"),
            ("q1", '#', "R", "q2"),
            ("q2", '#', "R", "q3"),
            ("q3", '#', "x", "h"),
        ]);
        assert_eq!(run(&table, ""), Ok("###x".to_string()));
        assert_eq!(run(&table, "#"), Ok("###x".to_string()));
    }

    #[test]
    fn test_start_in_halt_state_returns_input() {
        let table = TransitionTable::new();
        let config = MachineConfig {
            start_state: "h".to_string(),
            ..MachineConfig::default()
        };
        let mut machine = TuringMachine::with_config(&table, "abc", config);
        assert_eq!(machine.run(), Ok("abc".to_string()));
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_custom_config() {
        let table = table(&[("start", '_', "R", "start"), ("start", 'a', "b", "done")]);
        let config = MachineConfig {
            start_state: "start".to_string(),
            halt_state: "done".to_string(),
            blank: '_',
            max_steps: None,
        };

        let mut machine = TuringMachine::with_config(&table, "_a", config);
        assert_eq!(machine.run(), Ok("_b".to_string()));
    }

    #[test]
    fn test_step_limit() {
        // Bounces between two cells forever.
        let table = table(&[("q0", 'a', "R", "q1"), ("q1", 'b', "L", "q0")]);
        let config = MachineConfig::default().with_max_steps(10);

        let mut machine = TuringMachine::with_config(&table, "ab", config);
        assert_eq!(
            machine.run(),
            Err(TuringMachineError::StepLimitExceeded(10))
        );
        assert_eq!(machine.step_count(), 10);
    }

    #[test]
    fn test_step_limit_allows_halting_on_last_step() {
        let table = unary_increment();
        let config = MachineConfig::default().with_max_steps(3);

        let mut machine = TuringMachine::with_config(&table, "11", config);
        assert_eq!(machine.run(), Ok("111".to_string()));
    }

    #[test]
    fn test_run_with_observes_each_step() {
        let table = unary_increment();
        let mut machine = TuringMachine::new(&table, "1");

        let mut seen = Vec::new();
        let result = machine.run_with(|m| seen.push((m.step_count(), m.state().to_string(), m.head())));

        assert_eq!(result, Ok("11".to_string()));
        assert_eq!(
            seen,
            vec![(1, "q0".to_string(), 1), (2, "h".to_string(), 1)]
        );
    }

    #[test]
    fn test_run_with_skips_failed_step() {
        let table = table(&[("q0", 'a', "L", "q1")]);
        let mut machine = TuringMachine::new(&table, "a");

        let mut calls = 0;
        let result = machine.run_with(|_| calls += 1);
        assert_eq!(result, Err(TuringMachineError::TapeUnderflow));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_runs_share_table() {
        let table = unary_increment();
        let results: Vec<_> = ["", "1", "111"].iter().map(|t| run(&table, t)).collect();
        assert_eq!(
            results,
            vec![
                Ok("1".to_string()),
                Ok("11".to_string()),
                Ok("1111".to_string())
            ]
        );
    }
}
