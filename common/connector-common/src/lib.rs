//! Connector Common - Shared utilities for single-shot connectors
//!
//! A connector is invoked once per request: it reads one JSON document from
//! stdin and writes exactly one JSON document to stdout. This crate holds
//! the pieces every connector needs around that contract:
//!
//! - **Initialization**: [`init_tracing`] for stderr-only logging
//! - **Results**: [`write_json`] / [`json_line`] for emitting the response
//!
//! # Example
//!
//! ```rust,ignore
//! use connector_common::{init_tracing, write_json};
//!
//! init_tracing("my_connector", "warn")?;
//! let response = handle(request).await;
//! write_json(&mut std::io::stdout().lock(), &response, false)?;
//! ```

pub mod init;
pub mod result;

pub use init::init_tracing;
pub use result::{json_line, write_json};
