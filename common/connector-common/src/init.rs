//! Tracing initialization
//!
//! stdout carries the response document, so every log line goes to stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for a connector
///
/// Sets up logging to stderr with:
/// - Formatted output without ANSI colors
/// - Environment-based filtering via RUST_LOG
/// - `<crate_name>=<default_level>` when RUST_LOG is unset
///
/// Set `LOG_FORMAT=json` for structured JSON output.
///
/// # Example
///
/// ```rust,ignore
/// connector_common::init_tracing("mysql_connector", "warn")?;
/// ```
pub fn init_tracing(crate_name: &str, default_level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!("{}={}", crate_name, default_level)),
    };

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // Only one global subscriber can be installed per process
        let _ = init_tracing("connector_common", "warn");
        assert!(init_tracing("connector_common", "warn").is_err());
    }
}
