//! Row normalization
//!
//! Converts driver values into the closed set of cell types the response
//! carries, and assembles rows into ordered column-name maps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Row, Value};

use crate::types::{ConnectorError, RowMap};

/// A single normalized cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<CellValue> for serde_json::Value {
    fn from(cell: CellValue) -> Self {
        match cell {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Int(n) => n.into(),
            CellValue::UInt(n) => n.into(),
            // Non-finite floats have no JSON form
            CellValue::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Bool(b) => b.into(),
            CellValue::Text(s) => s.into(),
            CellValue::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true).into(),
        }
    }
}

/// The parts of a column definition normalization depends on
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    pub column_type: ColumnType,
    pub unsigned: bool,
    pub length: u32,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            unsigned: false,
            length: 0,
        }
    }
}

impl From<&Column> for ColumnMeta {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name_str().into_owned(),
            column_type: column.column_type(),
            unsigned: column.flags().contains(ColumnFlags::UNSIGNED_FLAG),
            length: column.column_length(),
        }
    }
}

/// Normalize one driver value for its column.
///
/// Binary-protocol values arrive typed; text-protocol values arrive as bytes
/// and are parsed by column type. Anything unparseable stays text.
pub fn normalize(value: Value, column: &ColumnMeta) -> CellValue {
    match value {
        Value::NULL => CellValue::Null,
        Value::Int(n) => CellValue::Int(n),
        Value::UInt(n) => CellValue::UInt(n),
        Value::Float(f) => CellValue::Float(f64::from(f)),
        Value::Double(d) => CellValue::Float(d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            timestamp_from_parts(year, month, day, hour, minute, second, micros)
                .map(CellValue::Timestamp)
                .unwrap_or_else(|| {
                    CellValue::Text(format!(
                        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                        year, month, day, hour, minute, second
                    ))
                })
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => CellValue::Text(
            format_time(negative, days, hours, minutes, seconds, micros),
        ),
        Value::Bytes(bytes) => normalize_bytes(bytes, column),
    }
}

fn normalize_bytes(bytes: Vec<u8>, column: &ColumnMeta) -> CellValue {
    if column.column_type == ColumnType::MYSQL_TYPE_BIT && column.length == 1 {
        return CellValue::Bool(bytes.iter().any(|b| *b != 0));
    }

    let text = String::from_utf8_lossy(&bytes).into_owned();
    let parsed = match column.column_type {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            if column.unsigned {
                text.parse().ok().map(CellValue::UInt)
            } else {
                text.parse().ok().map(CellValue::Int)
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
            text.parse().ok().map(CellValue::Float)
        }
        ColumnType::MYSQL_TYPE_DATE
        | ColumnType::MYSQL_TYPE_NEWDATE
        | ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => parse_timestamp(&text).map(CellValue::Timestamp),
        _ => None,
    };

    parsed.unwrap_or(CellValue::Text(text))
}

fn timestamp_from_parts(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
        .and_hms_micro_opt(u32::from(hour), u32::from(minute), u32::from(second), micros)
        .map(|naive| naive.and_utc())
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// `[-]HHH:MM:SS[.ffffff]`, days folded into hours
fn format_time(negative: bool, days: u32, hours: u8, minutes: u8, seconds: u8, micros: u32) -> String {
    let sign = if negative { "-" } else { "" };
    let total_hours = u64::from(days) * 24 + u64::from(hours);
    let mut out = format!("{}{:02}:{:02}:{:02}", sign, total_hours, minutes, seconds);
    if micros > 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

/// Turn a driver row into a column-ordered map
pub fn row_to_map(columns: &[ColumnMeta], row: &Row) -> Result<RowMap, ConnectorError> {
    if row.len() != columns.len() {
        return Err(ConnectorError::Columns(format!(
            "row has {} values for {} columns",
            row.len(),
            columns.len()
        )));
    }

    let mut map = RowMap::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        let value = row
            .as_ref(i)
            .cloned()
            .ok_or_else(|| ConnectorError::Scan(format!("column {} was not read", column.name)))?;
        map.insert(column.name.clone(), normalize(value, column).into());
    }
    Ok(map)
}
