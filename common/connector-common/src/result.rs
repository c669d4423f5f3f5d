//! Response output helpers
//!
//! A connector writes its response once, as a single JSON document
//! terminated by a newline.

use std::io::Write;

use serde::Serialize;

/// Serialize `data` into one JSON line (compact or pretty, newline-terminated)
pub fn json_line<T: Serialize>(data: &T, pretty: bool) -> serde_json::Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    json.push('\n');
    Ok(json)
}

/// Write `data` as a single JSON document to `writer` and flush it
///
/// The document is fully serialized before anything is written, so a
/// serialization failure never leaves partial output behind.
///
/// # Example
///
/// ```rust,ignore
/// use connector_common::write_json;
///
/// write_json(&mut std::io::stdout().lock(), &response, false)?;
/// ```
pub fn write_json<W: Write, T: Serialize>(
    writer: &mut W,
    data: &T,
    pretty: bool,
) -> anyhow::Result<()> {
    let line = json_line(data, pretty)?;
    writer.write_all(line.as_bytes())?;
    writer.flush()?;
    Ok(())
}
