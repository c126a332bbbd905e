//! This module renders a transition table as a Graphviz DOT digraph.
//!
//! The start state gets an arrow from an invisible entry node, the halt state is drawn as a
//! double circle, and each table entry becomes one edge labeled `symbol/action`.

use crate::table::TransitionTable;
use crate::types::MachineConfig;
use std::fmt::Write;

/// Renders `table` as DOT source for a graph labeled `name`.
///
/// States and symbols are emitted in sorted order, so the same table always renders to the
/// same text.
///
/// # Arguments
///
/// * `table` - The table to render.
/// * `name` - The graph label, usually the machine's file stem.
/// * `config` - Supplies the start and halt state identifiers.
pub fn to_dot(table: &TransitionTable, name: &str, config: &MachineConfig) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "digraph {} {{", quote(name));
    let _ = writeln!(
        out,
        "    graph [label={}, nodesep=\"1\", rankdir=\"LR\"];",
        quote(name)
    );

    let _ = writeln!(out, "    \"\" [shape=none];");
    let _ = writeln!(out, "    \"\" -> {};", quote(&config.start_state));

    let _ = writeln!(out, "    node [shape=doublecircle];");
    let _ = writeln!(out, "    {};", quote(&config.halt_state));

    let _ = writeln!(out, "    node [shape=circle];");

    let mut states: Vec<&str> = table.states().collect();
    states.sort_unstable();

    for state in states {
        let _ = writeln!(out, "    {};", quote(state));

        let Some(transitions) = table.transitions_from(state) else {
            continue;
        };

        let mut symbols: Vec<&char> = transitions.keys().collect();
        symbols.sort_unstable();

        for symbol in symbols {
            let transition = &transitions[symbol];
            let label = format!("{}/{}", symbol, transition.action);
            let _ = writeln!(
                out,
                "    {} -> {} [label={}];",
                quote(state),
                quote(&transition.next_state),
                quote(&label)
            );
        }
    }

    out.push_str("}\n");
    out
}

/// Quotes a DOT identifier, escaping backslashes and double quotes.
fn quote(id: &str) -> String {
    let mut quoted = String::with_capacity(id.len() + 2);
    quoted.push('"');
    for c in id.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
