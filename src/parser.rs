//! This module provides the parser for rule and test case files, utilizing the `pest` crate.
//!
//! Both formats are comma-delimited text with one record per line:
//!
//! * rules: `<state>,<symbol>,<action>,<next_state>`
//! * test cases: `<input>,<expected_output>`
//!
//! Fields are not trimmed, so whitespace is part of a state name or symbol. Blank lines are
//! skipped.

use crate::{
    table::{build_table, RuleRecord, TransitionTable},
    types::{Action, TuringMachineError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use serde::{Deserialize, Serialize};

/// Derives a `PestParser` for the delimited format defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DelimitedParser;

/// A single test case: the initial tape and the tape expected after halting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected: String,
}

/// A field value together with where it came from, for error reporting.
struct Field<'i> {
    value: String,
    span: Span<'i>,
}

/// Parses rule rows into `RuleRecord`s, in file order.
///
/// # Returns
///
/// * `Ok(Vec<RuleRecord>)` if every non-blank row is a valid rule.
/// * `Err(TuringMachineError::ParseError)` on a syntax error, a wrong field count, a symbol
///   that is not exactly one character, or an invalid action.
pub fn parse_rules(input: &str) -> Result<Vec<RuleRecord>, TuringMachineError> {
    let mut records = Vec::new();

    for (span, fields) in parse_rows(input)? {
        let [state, symbol, action, next_state] = expect_fields::<4>(
            fields,
            span,
            "<state>,<symbol>,<action>,<next_state>",
        )?;

        let symbol = parse_symbol(&symbol)?;
        let action = action.value.parse::<Action>().map_err(|_| {
            parse_error(
                &format!(
                    "Action must be L, R or a single symbol, found {:?}",
                    action.value
                ),
                action.span,
            )
        })?;

        records.push(RuleRecord {
            state: state.value,
            symbol,
            action,
            next_state: next_state.value,
        });
    }

    Ok(records)
}

/// Parses rule rows and builds a `TransitionTable` from them.
pub fn parse_table(input: &str) -> Result<TransitionTable, TuringMachineError> {
    parse_rules(input).map(build_table)
}

/// Parses test case rows, in file order.
pub fn parse_cases(input: &str) -> Result<Vec<TestCase>, TuringMachineError> {
    parse_rows(input)?
        .into_iter()
        .map(|(span, fields)| {
            let [input, expected] = expect_fields::<2>(fields, span, "<input>,<expected_output>")?;
            Ok(TestCase {
                input: input.value,
                expected: expected.value,
            })
        })
        .collect()
}

/// Parses the input into non-blank rows of fields.
fn parse_rows(input: &str) -> Result<Vec<(Span<'_>, Vec<Field<'_>>)>, TuringMachineError> {
    let file = DelimitedParser::parse(Rule::file, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty parse tree".to_string()))?;

    Ok(file
        .into_inner()
        .filter(|p| p.as_rule() == Rule::row)
        .map(|row| {
            let span = row.as_span();
            let fields = row.into_inner().map(parse_field).collect::<Vec<_>>();
            (span, fields)
        })
        .filter(|(_, fields)| !is_blank(fields))
        .collect())
}

/// Extracts the value of a `Pair<Rule::field>`, unescaping quoted fields.
fn parse_field(pair: Pair<Rule>) -> Field {
    let span = pair.as_span();
    let value = match pair.into_inner().next() {
        // Rule: field > quoted > quoted_inner
        Some(inner) if inner.as_rule() == Rule::quoted => inner
            .into_inner()
            .next()
            .map(|p| p.as_str().replace("\"\"", "\""))
            .unwrap_or_default(),
        Some(inner) => inner.as_str().to_string(),
        None => String::new(),
    };

    Field { value, span }
}

/// A blank line parses as one empty, unquoted field.
fn is_blank(fields: &[Field]) -> bool {
    matches!(fields, [field] if field.value.is_empty() && field.span.as_str().is_empty())
}

/// Checks that a row has exactly `N` fields.
fn expect_fields<'i, const N: usize>(
    fields: Vec<Field<'i>>,
    span: Span<'i>,
    layout: &str,
) -> Result<[Field<'i>; N], TuringMachineError> {
    let found = fields.len();
    fields.try_into().map_err(|_| {
        parse_error(
            &format!("Expected {N} fields {layout}, found {found}"),
            span,
        )
    })
}

/// Parses a tape symbol, which must be exactly one character.
fn parse_symbol(field: &Field) -> Result<char, TuringMachineError> {
    let mut chars = field.value.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(parse_error(
            &format!(
                "Symbol must be a single character, found {:?}",
                field.value
            ),
            field.span,
        )),
    }
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
