//! MySQL Connector Library
//!
//! Single-shot JSON-in/JSON-out access to a MySQL database: raw queries,
//! table dumps, stored procedure calls and stored function calls.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mysql_connector::{handlers, ConnectorConfig, MySqlConnector};
//!
//! let response = handlers::handle_input(std::io::stdin().lock(), &MySqlConnector, &ConnectorConfig::default()).await;
//! connector_common::write_json(&mut std::io::stdout().lock(), &response, false)?;
//! ```

pub mod config;
pub mod executor;
pub mod handlers;
pub mod params;
pub mod response;
pub mod statement;
pub mod types;

pub use config::ConnectorConfig;
pub use executor::{Connector, Database, MySqlConnector};
pub use types::{ConnectorError, Outcome, Request, RequestParam, Response};
