//! Parameter extraction
//!
//! Walks the flat request parameter list once, front to back. Later
//! occurrences of a name overwrite earlier ones.

use crate::types::{ConnectionDescriptor, ConnectorError, Operation, OperationMode, Request};

/// Raw values pulled out of a request, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub host: String,
    pub port: i64,
    pub username: String,
    pub password: String,
    pub dbname: String,
    pub data_type: Option<String>,
    pub object_name: String,
    pub query: String,
    pub parameters: String,
}

impl Extracted {
    /// Extract recognized parameters. Unrecognized names are ignored.
    pub fn from_request(request: &Request) -> Self {
        let mut out = Self::default();

        for param in &request.params {
            let val = param.compvalue.trim();
            match param.inputname.to_lowercase().as_str() {
                "host" => out.host = val.to_string(),
                "port" => {
                    // Unparseable ports keep whatever was there before
                    if let Some(port) = scan_int(val) {
                        out.port = port;
                    }
                }
                "username" => out.username = val.to_string(),
                "password" => out.password = val.to_string(),
                "dbname" => out.dbname = val.to_string(),
                "data_type" => {
                    if !val.is_empty() {
                        out.data_type = Some(val.to_lowercase());
                    }
                }
                "object_name" => out.object_name = val.to_string(),
                "query" => out.query = val.to_string(),
                "parameters" => out.parameters = val.to_string(),
                _ => {}
            }
        }

        out
    }

    /// Validate connection fields and split into descriptor and operation
    pub fn into_parts(
        self,
        default_port: u16,
    ) -> Result<(ConnectionDescriptor, Operation), ConnectorError> {
        if self.host.is_empty() || self.username.is_empty() || self.dbname.is_empty() {
            return Err(ConnectorError::MissingConnection);
        }

        let port = if self.port == 0 {
            i64::from(default_port)
        } else {
            self.port
        };

        let mode = self
            .data_type
            .as_deref()
            .map(OperationMode::from_data_type)
            .unwrap_or_default();

        let descriptor = ConnectionDescriptor {
            host: self.host,
            port,
            username: self.username,
            password: self.password,
            database: self.dbname,
        };

        let operation = Operation {
            mode,
            object_name: self.object_name,
            query: self.query,
            parameters: self.parameters,
        };

        Ok((descriptor, operation))
    }
}

/// Scan a leading decimal integer: optional sign, then digits.
///
/// Trailing garbage is ignored (`"3307abc"` is 3307); no leading digits
/// means no value.
fn scan_int(s: &str) -> Option<i64> {
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestParam;

    fn request(pairs: &[(&str, &str)]) -> Request {
        Request {
            params: pairs
                .iter()
                .map(|(name, value)| RequestParam::new(*name, *value))
                .collect(),
        }
    }

    fn connection() -> Vec<(&'static str, &'static str)> {
        vec![
            ("host", "db.local"),
            ("username", "app"),
            ("password", "secret"),
            ("dbname", "shop"),
        ]
    }

    #[test]
    fn test_names_are_case_insensitive_and_values_trimmed() {
        let extracted = Extracted::from_request(&request(&[
            ("HOST", "  db.local "),
            ("UserName", "app"),
            ("DbName", "shop\n"),
            ("Data_Type", " TABLE "),
        ]));

        assert_eq!(extracted.host, "db.local");
        assert_eq!(extracted.username, "app");
        assert_eq!(extracted.dbname, "shop");
        assert_eq!(extracted.data_type.as_deref(), Some("table"));
    }

    #[test]
    fn test_last_value_wins() {
        let extracted = Extracted::from_request(&request(&[
            ("query", "SELECT 1"),
            ("query", "SELECT 2"),
        ]));
        assert_eq!(extracted.query, "SELECT 2");
    }

    #[test]
    fn test_unknown_names_ignored() {
        let extracted = Extracted::from_request(&request(&[("colour", "blue")]));
        assert_eq!(extracted, Extracted::default());
    }

    #[test]
    fn test_port_parsing() {
        let extracted = Extracted::from_request(&request(&[("port", "3307")]));
        assert_eq!(extracted.port, 3307);

        let extracted = Extracted::from_request(&request(&[("port", "3307abc")]));
        assert_eq!(extracted.port, 3307);

        let extracted = Extracted::from_request(&request(&[("port", "3307"), ("port", "abc")]));
        assert_eq!(extracted.port, 3307);

        let extracted = Extracted::from_request(&request(&[("port", "-1")]));
        assert_eq!(extracted.port, -1);
    }

    #[test]
    fn test_blank_data_type_keeps_previous() {
        let extracted = Extracted::from_request(&request(&[
            ("data_type", "table"),
            ("data_type", "   "),
        ]));
        assert_eq!(extracted.data_type.as_deref(), Some("table"));
    }

    #[test]
    fn test_missing_connection_fields() {
        for missing in ["host", "username", "dbname"] {
            let pairs: Vec<_> = connection()
                .into_iter()
                .filter(|(name, _)| *name != missing)
                .collect();
            let err = Extracted::from_request(&request(&pairs))
                .into_parts(3306)
                .unwrap_err();
            assert_eq!(err, ConnectorError::MissingConnection);
        }
    }

    #[test]
    fn test_default_port_applied() {
        let (descriptor, operation) = Extracted::from_request(&request(&connection()))
            .into_parts(3306)
            .unwrap();
        assert_eq!(descriptor.port, 3306);
        assert_eq!(descriptor.password, "secret");
        assert_eq!(operation.mode, OperationMode::Query);

        let mut pairs = connection();
        pairs.push(("port", "0"));
        let (descriptor, _) = Extracted::from_request(&request(&pairs))
            .into_parts(3310)
            .unwrap();
        assert_eq!(descriptor.port, 3310);
    }

    #[test]
    fn test_operation_fields() {
        let mut pairs = connection();
        pairs.extend([
            ("data_type", "Stored_Procedure"),
            ("object_name", "proc1"),
            ("parameters", "[1, \"a\"]"),
        ]);
        let (_, operation) = Extracted::from_request(&request(&pairs))
            .into_parts(3306)
            .unwrap();
        assert_eq!(operation.mode, OperationMode::StoredProcedure);
        assert_eq!(operation.object_name, "proc1");
        assert_eq!(operation.parameters, "[1, \"a\"]");
    }

    #[test]
    fn test_scan_int() {
        assert_eq!(scan_int("42"), Some(42));
        assert_eq!(scan_int("+42"), Some(42));
        assert_eq!(scan_int("-7x"), Some(-7));
        assert_eq!(scan_int(""), None);
        assert_eq!(scan_int("-"), None);
        assert_eq!(scan_int("x1"), None);
    }
}
