//! CSV ingestion implementation.
//!
//! Two modes:
//!
//! - **schema-driven** ([`ingest_csv_from_reader`]): the caller supplies a [`Schema`] and every
//!   cell must parse as its field's type;
//! - **inferred** ([`infer_csv_from_reader`]): column types are inferred from the cells (see
//!   [`super::infer`]).

use std::io::Read;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Field, Schema, Table, Value};

use super::infer::{dedupe_headers, infer_data_type, parse_inferred, MissingMarkers};

/// Build a header-aware CSV reader over in-memory bytes.
pub fn reader_from_bytes(bytes: &[u8], delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(bytes)
}

/// Ingest a CSV file into an in-memory [`Table`] using `schema`.
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema, &MissingMarkers::default())
}

/// Ingest CSV data from an existing CSV reader using `schema`.
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
    markers: &MissingMarkers,
) -> IngestionResult<Table> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, field, raw, markers)?);
        }
        rows.push(row);
    }

    Ok(Table::new(schema.clone(), rows))
}

/// Ingest a CSV file, inferring column types.
pub fn infer_csv_from_path(path: impl AsRef<Path>, markers: &MissingMarkers) -> IngestionResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    infer_csv_from_reader(&mut rdr, markers)
}

/// Ingest CSV data from an existing reader, inferring column types.
///
/// Repeated header names are made unique (`a`, `a.1`, ...). Records must all have the header's
/// field count.
pub fn infer_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    markers: &MissingMarkers,
) -> IngestionResult<Table> {
    let names = dedupe_headers(rdr.headers()?.iter());
    let records = rdr.records().collect::<Result<Vec<_>, _>>()?;

    let fields: Vec<Field> = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells = records.iter().map(|r| r.get(idx).unwrap_or(""));
            Field::new(name, infer_data_type(cells, markers))
        })
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            fields
                .iter()
                .enumerate()
                .map(|(idx, f)| parse_inferred(record.get(idx).unwrap_or(""), f.data_type, markers))
                .collect()
        })
        .collect();

    Ok(Table::new(Schema::new(fields), rows))
}

fn parse_typed_value(
    row: usize,
    field: &Field,
    raw: &str,
    markers: &MissingMarkers,
) -> IngestionResult<Value> {
    if markers.is_missing(raw) {
        return Ok(Value::Null);
    }

    let trimmed = raw.trim();
    let parse_error = |message: String| IngestionError::ParseError {
        row,
        column: field.name.clone(),
        raw: raw.to_owned(),
        message,
    };

    match field.data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
