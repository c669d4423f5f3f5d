//! Request pipeline
//!
//! read -> extract -> connect -> build -> execute -> respond. Every stage
//! returns `Result<_, ConnectorError>`; the result is turned into a single
//! [`Response`] at the end, so an error can never follow partial output.

use std::io::Read;

use crate::config::ConnectorConfig;
use crate::executor::{Connector, Database};
use crate::params::Extracted;
use crate::statement::{self, BuildOptions, Statement, StatementKind};
use crate::types::{ConnectorError, Outcome, Request, Response};

/// Decode exactly one JSON request from `reader`. Trailing input is ignored.
pub fn read_request<R: Read>(reader: R) -> Result<Request, ConnectorError> {
    let mut stream = serde_json::Deserializer::from_reader(reader).into_iter::<Request>();
    match stream.next() {
        Some(Ok(request)) => Ok(request),
        Some(Err(e)) => Err(ConnectorError::Decode(e.to_string())),
        None => Err(ConnectorError::Decode("EOF".to_string())),
    }
}

/// Read a request from `reader` and handle it
pub async fn handle_input<R: Read>(
    reader: R,
    connector: &dyn Connector,
    config: &ConnectorConfig,
) -> Response {
    match read_request(reader) {
        Ok(request) => handle(&request, connector, config).await,
        Err(err) => {
            tracing::debug!("Request rejected: {}", err);
            Response::failure(&err)
        }
    }
}

/// Handle a decoded request
pub async fn handle(
    request: &Request,
    connector: &dyn Connector,
    config: &ConnectorConfig,
) -> Response {
    let result = process(request, connector, config).await;
    if let Err(err) = &result {
        tracing::debug!("Request failed: {}", err);
    }
    Response::from(result)
}

async fn process(
    request: &Request,
    connector: &dyn Connector,
    config: &ConnectorConfig,
) -> Result<Outcome, ConnectorError> {
    let (descriptor, operation) =
        Extracted::from_request(request).into_parts(config.connection.default_port)?;

    // Connectivity is checked before any mode-specific validation
    let mut db = connector.connect(&descriptor).await?;

    let options = BuildOptions {
        strict_identifiers: config.statements.strict_identifiers,
    };
    let outcome = match statement::build(&operation, &options) {
        Ok(statement) => {
            tracing::debug!(
                mode = %operation.mode,
                sql = %statement.sql,
                args = statement.args.len(),
                "Built statement"
            );
            run_statement(db.as_mut(), &statement).await
        }
        Err(err) => Err(err),
    };
    db.close().await;

    outcome
}

/// Execute a built statement on an open connection
pub async fn run_statement(
    db: &mut dyn Database,
    statement: &Statement,
) -> Result<Outcome, ConnectorError> {
    match statement.kind {
        StatementKind::RowProducing => Ok(Outcome::Rows(db.query(statement).await?)),
        StatementKind::EffectProducing => Ok(Outcome::Effect(db.execute(statement).await?)),
    }
}
