//! Serialization of a [`Table`] for download or hand-off.
//!
//! The CSV form has a header row of column names and one record per row. Missing cells become
//! empty fields, which makes missing cells indistinguishable from empty strings after a round
//! trip. Quoting follows the `csv` crate's defaults: fields containing the delimiter, a quote, or
//! a line break are quoted and embedded quotes are doubled.
//!
//! `Float64` cells are always written with a fractional part or exponent (`50000.0`, not `50000`)
//! so that re-ingesting with type inference yields `Float64` again.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{CleaningError, CleaningResult};
use crate::types::{Table, Value};

/// Write `table` as CSV to `writer`.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> CleaningResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.column_names())?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(render_cell))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render `table` as a CSV string.
pub fn to_csv_string(table: &Table) -> CleaningResult<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| CleaningError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Write `table` as CSV to a file at `path`, replacing it if it exists.
pub fn write_csv_to_path(table: &Table, path: impl AsRef<Path>) -> CleaningResult<()> {
    write_csv(table, File::create(path)?)
}

/// Render `table` as a JSON array of objects keyed by column name; missing cells are `null`.
pub fn to_json_records(table: &Table) -> serde_json::Value {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let obj = table
                .column_names()
                .zip(row)
                .map(|(name, value)| (name.to_string(), json_cell(value)))
                .collect::<serde_json::Map<_, _>>();
            serde_json::Value::Object(obj)
        })
        .collect();
    serde_json::Value::Array(records)
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        // Debug keeps a trailing `.0` on integral floats.
        Value::Float64(v) => format!("{v:?}"),
        Value::Bool(v) => v.to_string(),
        Value::Utf8(s) => s.clone(),
    }
}

fn json_cell(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Int64(v) => serde_json::Value::from(*v),
        // Non-finite floats have no JSON spelling and become null.
        Value::Float64(v) => serde_json::Number::from_f64(*v).map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Bool(v) => serde_json::Value::Bool(*v),
        Value::Utf8(s) => serde_json::Value::String(s.clone()),
    }
}
