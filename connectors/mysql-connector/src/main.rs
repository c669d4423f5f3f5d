//! MySQL Connector
//!
//! Reads one JSON request from stdin, runs it against MySQL and writes one
//! JSON response to stdout. Failures are reported in the response's
//! `error` field; the exit status is 0 either way.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use mysql_connector::{handlers, ConnectorConfig, ConnectorError, MySqlConnector, Response};

#[derive(Parser)]
#[command(name = "mysql-connector")]
#[command(about = "Run one JSON-described MySQL request from stdin and print the JSON result")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, env = "MYSQL_CONNECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The response is still written when logging cannot be set up
    if let Err(e) = connector_common::init_tracing("mysql_connector", "warn") {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    let (response, pretty) = match ConnectorConfig::load(cli.config.as_deref()) {
        Ok(config) => {
            let response =
                handlers::handle_input(std::io::stdin().lock(), &MySqlConnector, &config).await;
            (response, cli.pretty || config.output.pretty)
        }
        Err(e) => {
            let err = ConnectorError::Config(format!("{:#}", e));
            tracing::debug!("{}", err);
            (Response::failure(&err), cli.pretty)
        }
    };

    connector_common::write_json(&mut std::io::stdout().lock(), &response, pretty)?;
    Ok(())
}
