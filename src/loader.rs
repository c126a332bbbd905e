//! This module provides the `MachineLoader` struct, responsible for loading transition tables
//! and test cases from files.

use crate::parser::{parse_cases, parse_table, TestCase};
use crate::table::TransitionTable;
use crate::types::TuringMachineError;
use std::fs;
use std::path::Path;

/// `MachineLoader` is a utility struct for loading rule and test case files.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a transition table from a rule file at the specified path.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the file is read and every rule parses.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if a row is not a valid rule.
    pub fn load_table(path: &Path) -> Result<TransitionTable, TuringMachineError> {
        parse_table(&Self::read(path)?)
    }

    /// Loads test cases from the specified path.
    pub fn load_cases(path: &Path) -> Result<Vec<TestCase>, TuringMachineError> {
        parse_cases(&Self::read(path)?)
    }

    fn read(path: &Path) -> Result<String, TuringMachineError> {
        fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_table() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("increment.csv");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"q0,1,R,q0\nq0,#,1,h\n").unwrap();

        let table = MachineLoader::load_table(&file_path).unwrap();
        assert_eq!(table.state_count(), 1);
        assert_eq!(table.lookup("q0", '#').unwrap().action, Action::Write('1'));
    }

    #[test]
    fn test_load_invalid_table() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.csv");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not a valid machine").unwrap();

        let result = MachineLoader::load_table(&file_path);
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = MachineLoader::load_table(&dir.path().join("missing.csv"));

        match result {
            Err(TuringMachineError::FileError(msg)) => assert!(msg.contains("missing.csv")),
            other => panic!("Expected a file error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_cases() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("cases.csv");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"11,111\n,1\n").unwrap();

        let cases = MachineLoader::load_cases(&file_path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].input, "11");
        assert_eq!(cases[1].expected, "1");
    }
}
