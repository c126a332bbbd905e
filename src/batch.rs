//! Batch testing: runs a list of test cases against one transition table and reports each
//! case as passed, mismatched, or failed.

use crate::machine::TuringMachine;
use crate::parser::TestCase;
use crate::table::TransitionTable;
use crate::types::MachineConfig;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// How a single test case ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// The machine halted with the expected tape.
    Passed,
    /// The machine halted with a different tape.
    Mismatch { expected: String, found: String },
    /// The machine did not halt.
    Error { message: String },
}

/// The result of one test case. `index` counts from 1 in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub index: usize,
    pub input: String,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.outcome == CaseOutcome::Passed
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CaseOutcome::Passed => write!(f, "#{} Passed", self.index),
            CaseOutcome::Mismatch { expected, found } => write!(
                f,
                "#{} Failed -> Expected {}, Found {}",
                self.index, expected, found
            ),
            CaseOutcome::Error { message } => write!(f, "#{} Error: {}", self.index, message),
        }
    }
}

/// Counts of each outcome over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub mismatched: usize,
    pub errored: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[CaseReport]) -> Self {
        reports
            .iter()
            .fold(Self::default(), |mut summary, report| {
                summary.total += 1;
                match report.outcome {
                    CaseOutcome::Passed => summary.passed += 1,
                    CaseOutcome::Mismatch { .. } => summary.mismatched += 1,
                    CaseOutcome::Error { .. } => summary.errored += 1,
                }
                summary
            })
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Runs one test case on a fresh machine.
pub fn run_case(
    table: &TransitionTable,
    index: usize,
    case: &TestCase,
    config: &MachineConfig,
) -> CaseReport {
    let outcome = match TuringMachine::with_config(table, &case.input, config.clone()).run() {
        Ok(found) if found == case.expected => CaseOutcome::Passed,
        Ok(found) => CaseOutcome::Mismatch {
            expected: case.expected.clone(),
            found,
        },
        Err(e) => CaseOutcome::Error {
            message: e.to_string(),
        },
    };

    debug!(index, input = %case.input, ?outcome, "test case finished");

    CaseReport {
        index,
        input: case.input.clone(),
        outcome,
    }
}

/// Runs every case independently, returning one report per case in input order.
pub fn run_cases(
    table: &TransitionTable,
    cases: &[TestCase],
    config: &MachineConfig,
) -> Vec<CaseReport> {
    cases
        .iter()
        .enumerate()
        .map(|(i, case)| run_case(table, i + 1, case, config))
        .collect()
}
