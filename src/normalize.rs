//! Result normalization.
//!
//! Converts driver-native values into plain JSON: integers become numbers,
//! temporal values become `YYYY-MM-DD` strings (UTC), nodes collapse to their
//! property maps. Conversion is total; nothing here can fail.

use serde_json::{Map, Number, Value};

use crate::graph::{GraphValue, Row};

/// Normalize one value.
pub fn normalize_value(value: &GraphValue) -> Value {
    match value {
        GraphValue::Null => Value::Null,
        GraphValue::Boolean(b) => Value::Bool(*b),
        GraphValue::Integer(n) => Value::Number((*n).into()),
        GraphValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        GraphValue::String(s) => Value::String(s.clone()),
        GraphValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        GraphValue::DateTime(dt) => {
            Value::String(dt.naive_utc().date().format("%Y-%m-%d").to_string())
        }
        GraphValue::LocalDateTime(dt) => Value::String(dt.date().format("%Y-%m-%d").to_string()),
        GraphValue::List(items) => Value::Array(items.iter().map(normalize_value).collect()),
        GraphValue::Map(entries) | GraphValue::Node { properties: entries, .. } => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), normalize_value(v)))
                .collect(),
        ),
    }
}

/// Normalize a single named field of a row. Absent fields become `null`.
pub fn normalize_field(row: &Row, field: &str) -> Value {
    row.get(field).map(normalize_value).unwrap_or(Value::Null)
}

/// Normalize every field of a row into one JSON object.
pub fn normalize_row(row: &Row) -> Map<String, Value> {
    row.fields()
        .iter()
        .map(|(k, v)| (k.clone(), normalize_value(v)))
        .collect()
}

/// Normalize the same named field across a result set.
pub fn normalize_records(rows: &[Row], field: &str) -> Vec<Value> {
    rows.iter().map(|row| normalize_field(row, field)).collect()
}
