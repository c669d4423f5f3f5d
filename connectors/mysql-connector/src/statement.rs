//! Statement builder
//!
//! Turns an [`Operation`] into exactly one SQL statement plus its positional
//! arguments. Object names are spliced into the statement text; only
//! routine arguments are bound through placeholders.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::{ConnectorError, Operation, OperationMode};

/// Identifier or `schema.identifier`, no quoting
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$")
        .expect("identifier pattern is valid")
});

/// Statement prefixes that return a cursor in raw query mode
const ROW_PRODUCING_PREFIXES: [&str; 5] = ["SELECT", "SHOW", "DESCRIBE", "EXPLAIN", "CALL"];

/// How a statement should be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Run as a query and read rows back
    RowProducing,
    /// Run as an execute and report last insert id / affected rows
    EffectProducing,
}

/// A built statement ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
    pub kind: StatementKind,
}

/// Builder switches
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Reject object names that are not plain identifiers
    pub strict_identifiers: bool,
}

/// Build the statement for an operation
pub fn build(operation: &Operation, options: &BuildOptions) -> Result<Statement, ConnectorError> {
    match operation.mode {
        OperationMode::Table => {
            let name = object_name(operation, options)?;
            Ok(Statement {
                sql: format!("SELECT * FROM {}", name),
                args: Vec::new(),
                kind: StatementKind::RowProducing,
            })
        }
        OperationMode::StoredProcedure => routine_call("CALL", operation, options),
        OperationMode::StoredFunction => routine_call("SELECT", operation, options),
        OperationMode::Query => {
            if operation.query.is_empty() {
                return Err(ConnectorError::MissingQuery);
            }
            let kind = if is_row_producing(&operation.query) {
                StatementKind::RowProducing
            } else {
                StatementKind::EffectProducing
            };
            Ok(Statement {
                sql: operation.query.clone(),
                args: Vec::new(),
                kind,
            })
        }
    }
}

/// `<verb> name(?,?,...)` with one placeholder per parsed argument
fn routine_call(
    verb: &str,
    operation: &Operation,
    options: &BuildOptions,
) -> Result<Statement, ConnectorError> {
    let name = object_name(operation, options)?;
    let args = parse_args(&operation.parameters)?;
    Ok(Statement {
        sql: format!("{} {}({})", verb, name, placeholders(args.len())),
        args,
        kind: StatementKind::RowProducing,
    })
}

fn object_name<'a>(
    operation: &'a Operation,
    options: &BuildOptions,
) -> Result<&'a str, ConnectorError> {
    let name = operation.object_name.as_str();
    if name.is_empty() {
        return Err(ConnectorError::MissingObjectName(operation.mode));
    }
    if options.strict_identifiers && !IDENTIFIER.is_match(name) {
        return Err(ConnectorError::InvalidObjectName(name.to_string()));
    }
    Ok(name)
}

/// Textual prefix check on the trimmed, upper-cased query
pub fn is_row_producing(query: &str) -> bool {
    let normalized = query.trim().to_uppercase();
    ROW_PRODUCING_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

/// Decode the `parameters` JSON array. Empty input means no arguments.
pub fn parse_args(parameters: &str) -> Result<Vec<Value>, ConnectorError> {
    if parameters.is_empty() {
        return Ok(Vec::new());
    }
    // `null` decodes to no arguments
    let args: Option<Vec<Value>> = serde_json::from_str(parameters)
        .map_err(|e| ConnectorError::InvalidParameters(e.to_string()))?;
    Ok(args.unwrap_or_default())
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}
