//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! With a schema, nested fields are supported using dot paths in field names (e.g. `user.name`).
//! Without one, top-level keys become columns in first-seen order and types are inferred.

use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Field, Schema, Table, Value};

/// Ingest a JSON file into an in-memory [`Table`] using `schema`.
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<Table> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema)
}

/// Ingest JSON from an in-memory string into a [`Table`] using `schema`.
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> IngestionResult<Table> {
    let values = parse_documents(input)?;
    let objects = as_objects(&values)?;

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(objects.len());
    for (idx0, obj) in objects.iter().enumerate() {
        let row_num = idx0 + 1;
        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let jv = get_by_dot_path(obj, &field.name).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {row_num} missing required field '{}'", field.name),
            })?;
            row.push(convert_json_value(row_num, &field.name, field.data_type, jv)?);
        }
        rows.push(row);
    }

    Ok(Table::new(schema.clone(), rows))
}

/// Ingest JSON from an in-memory string, inferring columns and types.
///
/// Numbers become `Int64` (all integral) or `Float64`, booleans `Bool`, and anything else
/// (including mixed columns) `Utf8`. Absent keys and `null` are missing.
pub fn infer_json_from_str(input: &str) -> IngestionResult<Table> {
    let values = parse_documents(input)?;
    let objects = as_objects(&values)?;

    let mut names: Vec<&str> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }

    let fields: Vec<Field> = names
        .iter()
        .map(|&name| {
            let cells = objects.iter().filter_map(|o| o.get(name));
            Field::new(name, infer_json_type(cells))
        })
        .collect();

    let rows = objects
        .iter()
        .map(|obj| {
            fields
                .iter()
                .map(|f| match obj.get(&f.name) {
                    None | Some(serde_json::Value::Null) => Value::Null,
                    Some(jv) => coerce_inferred(jv, f.data_type),
                })
                .collect()
        })
        .collect();

    Ok(Table::new(Schema::new(fields), rows))
}

fn parse_documents(input: &str) -> IngestionResult<Vec<serde_json::Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return match v {
            serde_json::Value::Array(items) => Ok(items),
            serde_json::Value::Object(_) => Ok(vec![v]),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        };
    }

    // Fall back to NDJSON.
    let mut values = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
            IngestionError::SchemaMismatch {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            }
        })?;
        values.push(v);
    }
    Ok(values)
}

fn as_objects(values: &[serde_json::Value]) -> IngestionResult<Vec<&Map<String, serde_json::Value>>> {
    values
        .iter()
        .enumerate()
        .map(|(idx0, v)| {
            v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {} is not a json object", idx0 + 1),
            })
        })
        .collect()
}

fn get_by_dot_path<'a>(
    root: &'a Map<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        match current {
            serde_json::Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

fn infer_json_type<'a>(cells: impl Iterator<Item = &'a serde_json::Value>) -> DataType {
    let mut seen: Option<DataType> = None;
    for v in cells {
        let t = match v {
            serde_json::Value::Null => continue,
            serde_json::Value::Number(n) if n.is_i64() => DataType::Int64,
            serde_json::Value::Number(_) => DataType::Float64,
            serde_json::Value::Bool(_) => DataType::Bool,
            _ => DataType::Utf8,
        };
        seen = Some(match (seen, t) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64 | DataType::Float64), DataType::Int64 | DataType::Float64) => {
                DataType::Float64
            }
            _ => return DataType::Utf8,
        });
    }
    seen.unwrap_or(DataType::Float64)
}

fn coerce_inferred(v: &serde_json::Value, data_type: DataType) -> Value {
    match (data_type, v) {
        (DataType::Int64, _) => v.as_i64().map_or(Value::Null, Value::Int64),
        (DataType::Float64, _) => v.as_f64().map_or(Value::Null, Value::Float64),
        (DataType::Bool, _) => v.as_bool().map_or(Value::Null, Value::Bool),
        (DataType::Utf8, serde_json::Value::String(s)) => Value::Utf8(s.clone()),
        (DataType::Utf8, other) => Value::Utf8(other.to_string()),
    }
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: DataType,
    v: &serde_json::Value,
) -> IngestionResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }

    let parse_error = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => v
            .as_str()
            .map(|s| Value::Utf8(s.to_string()))
            .ok_or_else(|| parse_error("expected string")),
        DataType::Bool => v.as_bool().map(Value::Bool).ok_or_else(|| parse_error("expected bool")),
        DataType::Int64 => {
            if let Some(n) = v.as_i64() {
                Ok(Value::Int64(n))
            } else if let Some(n) = v.as_u64() {
                i64::try_from(n)
                    .map(Value::Int64)
                    .map_err(|_| parse_error("u64 out of range for i64"))
            } else {
                Err(parse_error("expected integer number"))
            }
        }
        DataType::Float64 => v.as_f64().map(Value::Float64).ok_or_else(|| parse_error("expected number")),
    }
}
