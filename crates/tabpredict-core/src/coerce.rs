//! Projection and numeric coercion of a raw batch

use crate::error::Result;
use crate::schema::FeatureSchema;
use crate::types::{effective_columns, Frame, RawRow};
use serde_json::{Number, Value};
use tracing::debug;

/// Project a batch onto the schema and coerce numeric columns.
///
/// Each row is reduced to the schema's columns in schema order; absent keys
/// become `Null`. Values in numeric columns go through [`coerce_numeric`],
/// which never fails. Other columns keep the value as sent.
///
/// With an empty schema the batch passes through as-is: columns are the
/// batch's effective column set and nothing is coerced.
pub fn coerce(rows: &[RawRow], schema: &FeatureSchema) -> Result<Frame> {
    if schema.is_empty() {
        let columns = effective_columns(rows);
        let cells = rows.iter().map(|row| project(row, &columns, |_, v| v)).collect();
        return Frame::new(columns, cells);
    }

    let columns = schema.names().to_vec();
    let numeric: Vec<bool> = columns.iter().map(|c| schema.is_numeric(c)).collect();

    let mut nulled = 0usize;
    let cells = rows
        .iter()
        .map(|row| {
            project(row, &columns, |i, value| {
                if !numeric[i] {
                    return value;
                }
                let coerced = coerce_numeric(&value);
                if coerced.is_null() && !value.is_null() {
                    nulled += 1;
                }
                coerced
            })
        })
        .collect();

    if nulled > 0 {
        debug!("Coerced {} unparseable numeric values to null", nulled);
    }

    Frame::new(columns, cells)
}

fn project(
    row: &RawRow,
    columns: &[String],
    mut cell: impl FnMut(usize, Value) -> Value,
) -> Vec<Value> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| cell(i, row.get(column).cloned().unwrap_or(Value::Null)))
        .collect()
}

/// Best-effort conversion of a scalar to a JSON number.
///
/// Numbers pass through, strings are trimmed and parsed as `f64`, booleans
/// map to 1 and 0. Anything else, including NaN and infinities, is `Null`.
pub fn coerce_numeric(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Value::Bool(b) => Value::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => Value::Null,
    }
}
