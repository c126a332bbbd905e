mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tmemu::{
    analyze, run_cases, to_dot, validate, BatchSummary, CaseReport, MachineConfig, MachineLoader,
    TestCase, TransitionTable, TuringMachine, TuringMachineError,
};
use tracing::{info, warn};

/// Single-tape Turing machine emulator.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tmemu-cli machines/unary-increment.csv --tape 11
  tmemu-cli machines/binary-increment.csv --tests machines/binary-increment.tests.csv")]
struct Cli {
    /// CSV file containing the rules of the machine: <state>,<symbol>,<action>,<next_state>.
    /// An action of L or R moves the head, any other symbol is written to the tape.
    machine: PathBuf,

    /// The input tape. By convention it starts and ends with `#`.
    #[clap(short, long)]
    tape: Option<String>,

    /// CSV file containing test cases: <input>,<expected_output>
    #[clap(long)]
    tests: Option<PathBuf>,

    /// Write a Graphviz (.dot) diagram of the machine next to the rule file
    #[clap(short, long)]
    render: bool,

    /// Stop runs that have not halted after this many steps
    #[clap(long)]
    max_steps: Option<usize>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print test reports as JSON
    #[clap(long)]
    json: bool,

    /// Refuse to run a machine whose rules have analysis findings
    #[clap(long)]
    strict: bool,
}

/// Test reports and their summary, as printed by `--json`.
#[derive(Serialize)]
struct BatchOutput<'a> {
    reports: &'a [CaseReport],
    summary: BatchSummary,
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = MachineConfig {
        max_steps: cli.max_steps,
        ..MachineConfig::default()
    };

    let table = MachineLoader::load_table(&cli.machine)
        .with_context(|| format!("failed to load machine {}", cli.machine.display()))?;

    check(&table, &config, cli.strict)?;

    if cli.render {
        let path = render(&table, &cli.machine, &config)?;
        info!(path = %path.display(), "wrote diagram");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(tape) = &cli.tape {
        run_tape(&table, tape, &config, cli.debug, &mut out)?;
    }

    if let Some(tests) = &cli.tests {
        let cases = MachineLoader::load_cases(tests)
            .with_context(|| format!("failed to load test cases {}", tests.display()))?;
        let summary = run_tests(&table, &cases, &config, cli.json, &mut out)?;
        info!(
            total = summary.total,
            passed = summary.passed,
            mismatched = summary.mismatched,
            errored = summary.errored,
            "test run finished"
        );
    }

    Ok(())
}

/// Logs analysis findings, failing instead when `strict` is set.
fn check(table: &TransitionTable, config: &MachineConfig, strict: bool) -> Result<()> {
    if strict {
        validate(table, config)?;
    }

    for finding in analyze(table, config) {
        warn!("{}", TuringMachineError::from(finding));
    }

    Ok(())
}

/// Writes the DOT diagram of `table` next to `machine` and returns its path.
fn render(table: &TransitionTable, machine: &Path, config: &MachineConfig) -> Result<PathBuf> {
    let name = machine
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "machine".to_string());
    let path = machine.with_extension("dot");

    fs::write(&path, to_dot(table, &name, config))
        .with_context(|| format!("failed to write diagram {}", path.display()))?;

    Ok(path)
}

/// Runs a single tape and prints the final tape or the failure.
fn run_tape(
    table: &TransitionTable,
    tape: &str,
    config: &MachineConfig,
    debug: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut machine = TuringMachine::with_config(table, tape, config.clone());

    let result = if debug {
        print_state(&machine, &mut *out)?;

        let mut written = Ok(());
        let result = machine.run_with(|m| {
            if written.is_ok() {
                written = print_state(m, &mut *out);
            }
        });
        written?;

        writeln!(out)?;
        result
    } else {
        machine.run()
    };

    match result {
        Ok(tape) => writeln!(out, "{tape}"),
        Err(e) => writeln!(out, "Error: {e}"),
    }
}

fn print_state(machine: &TuringMachine, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "Step: {}, State: {}, Head: {}, Tape: {}",
        machine.step_count(),
        machine.state(),
        machine.head(),
        machine.tape()
    )
}

/// Runs every test case and prints one report per case, in input order.
fn run_tests(
    table: &TransitionTable,
    cases: &[TestCase],
    config: &MachineConfig,
    json: bool,
    out: &mut impl Write,
) -> Result<BatchSummary> {
    let reports = run_cases(table, cases, config);
    let summary = BatchSummary::from_reports(&reports);

    if json {
        let output = BatchOutput {
            reports: &reports,
            summary,
        };
        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)?;
    } else {
        for report in &reports {
            writeln!(out, "{report}")?;
        }
    }

    Ok(summary)
}
