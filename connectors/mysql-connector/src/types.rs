//! Type definitions for the MySQL connector

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ============================================================================
// Request Types
// ============================================================================

/// Request document read from stdin
///
/// ```json
/// { "params": [ { "inputname": "host", "compvalue": "db.local" } ] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Vec<RequestParam>,
}

/// One named request parameter. Names are matched case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestParam {
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub compvalue: String,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl RequestParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inputname: name.into(),
            compvalue: value.into(),
        }
    }
}

/// What the request asks the connector to do, selected by `data_type`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperationMode {
    #[default]
    Query,
    Table,
    StoredProcedure,
    StoredFunction,
}

impl OperationMode {
    /// Map a lower-cased `data_type` to a mode. Anything unrecognized is a raw query.
    pub fn from_data_type(data_type: &str) -> Self {
        match data_type {
            "table" => Self::Table,
            "stored_procedure" => Self::StoredProcedure,
            "stored_function" => Self::StoredFunction,
            _ => Self::Query,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Table => "table",
            Self::StoredProcedure => "stored_procedure",
            Self::StoredFunction => "stored_function",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and as whom to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    /// Kept wide so out-of-range request values surface as connect errors
    pub port: i64,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Mode plus the mode-dependent payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operation {
    pub mode: OperationMode,
    pub object_name: String,
    pub query: String,
    /// JSON-encoded argument array for stored routines
    pub parameters: String,
}

// ============================================================================
// Response Types
// ============================================================================

/// One result row: column name to normalized value, in column order
pub type RowMap = serde_json::Map<String, serde_json::Value>;

/// Effect summary for statements that do not produce rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecSummary {
    pub last_insert_id: u64,
    pub rows_affected: u64,
}

/// Successful outcome of a request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Rows(Vec<RowMap>),
    Effect(ExecSummary),
}

/// Response document written to stdout. At most one field is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(outcome: Outcome) -> Self {
        Self {
            result: Some(outcome),
            error: None,
        }
    }

    pub fn failure(err: &ConnectorError) -> Self {
        Self {
            result: None,
            error: Some(err.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<Result<Outcome, ConnectorError>> for Response {
    fn from(result: Result<Outcome, ConnectorError>) -> Self {
        match result {
            Ok(outcome) => Self::success(outcome),
            Err(err) => Self::failure(&err),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Every way a request can fail. The `Display` text is what the caller sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("failed to decode input: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("host, username, and dbname are required")]
    MissingConnection,

    #[error("object_name is required for {0}")]
    MissingObjectName(OperationMode),

    #[error("query is required")]
    MissingQuery,

    #[error("invalid object_name: {0}")]
    InvalidObjectName(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("failed to ping db: {0}")]
    Ping(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("columns error: {0}")]
    Columns(String),

    #[error("scan error: {0}")]
    Scan(String),
}
