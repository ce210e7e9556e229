//! Data-quality statistics computed on demand from a [`Table`].
//!
//! Every function here is pure: it borrows the table, never mutates it, and never caches results
//! across calls. Callers that need numbers for both the original and the working table simply call
//! again with the other table.
//!
//! ## Missing-value totals
//!
//! [`DatasetStatistics::total_missing`] counts missing cells in **every** column, while
//! [`DatasetStatistics::numeric_missing`] and [`DatasetStatistics::text_missing`] only count their
//! own kind. Columns of kind [`ColumnKind::Other`] therefore contribute to the total but to neither
//! sub-total:
//!
//! ```rust
//! use rust_data_cleaning::statistics::dataset_statistics;
//! use rust_data_cleaning::types::{DataType, Field, Schema, Table, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("age", DataType::Int64),
//!     Field::new("name", DataType::Utf8),
//!     Field::new("active", DataType::Bool),
//! ]);
//! let t = Table::new(schema, vec![vec![Value::Null, Value::Null, Value::Null]]);
//!
//! let stats = dataset_statistics(&t);
//! assert_eq!(stats.numeric_missing, 1);
//! assert_eq!(stats.text_missing, 1);
//! assert_eq!(stats.total_missing, 3);
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::classify::indexes_of_kind;
use crate::types::{ColumnKind, RowKey, Table, Value};

/// Missing/present breakdown of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStatistics {
    /// Column name.
    pub column: String,
    /// Declared kind of the column.
    pub kind: ColumnKind,
    /// Number of missing cells.
    pub missing: usize,
    /// Number of present cells.
    pub present: usize,
    /// Total number of cells (`missing + present`).
    pub rows: usize,
}

/// Aggregate data-quality metrics for a whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStatistics {
    /// Missing cells across numeric columns.
    pub numeric_missing: usize,
    /// Missing cells across text columns.
    pub text_missing: usize,
    /// Missing cells across all columns, whatever their kind.
    pub total_missing: usize,
    /// Rows identical to an earlier row (first occurrences are not counted).
    pub duplicate_rows: usize,
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub columns: usize,
}

/// Descriptive summary of one numeric column.
///
/// Fields are `None` when undefined: everything but `count` for a column with no present values,
/// and `std` for fewer than two present values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Column name.
    pub column: String,
    /// Number of present (non-missing) values.
    pub count: usize,
    /// Arithmetic mean of the present values.
    pub mean: Option<f64>,
    /// Sample standard deviation (`n - 1` denominator).
    pub std: Option<f64>,
    /// Smallest present value.
    pub min: Option<f64>,
    /// 25th percentile, linearly interpolated.
    pub q25: Option<f64>,
    /// 50th percentile.
    pub median: Option<f64>,
    /// 75th percentile, linearly interpolated.
    pub q75: Option<f64>,
    /// Largest present value.
    pub max: Option<f64>,
}

/// Missing/present counts over the full value sequence of `column`.
///
/// Returns `None` if the column does not exist.
pub fn column_statistics(table: &Table, column: &str) -> Option<ColumnStatistics> {
    let idx = table.schema.index_of(column)?;
    let field = table.schema.fields.get(idx)?;
    let missing = missing_in(table, idx);
    Some(ColumnStatistics {
        column: field.name.clone(),
        kind: field.kind(),
        missing,
        present: table.row_count() - missing,
        rows: table.row_count(),
    })
}

/// Aggregate metrics for `table`.
pub fn dataset_statistics(table: &Table) -> DatasetStatistics {
    let per_column: Vec<usize> = (0..table.column_count())
        .map(|idx| missing_in(table, idx))
        .collect();
    let sum_kind = |kind: ColumnKind| -> usize {
        indexes_of_kind(table, kind)
            .into_iter()
            .filter_map(|idx| per_column.get(idx))
            .sum()
    };

    DatasetStatistics {
        numeric_missing: sum_kind(ColumnKind::Numeric),
        text_missing: sum_kind(ColumnKind::Text),
        total_missing: per_column.iter().sum(),
        duplicate_rows: duplicate_row_count(table),
        rows: table.row_count(),
        columns: table.column_count(),
    }
}

/// Names of columns of `kind` with at least one missing cell, in schema order.
///
/// This is the set of columns a fill operation for `kind` touches.
pub fn columns_with_missing(table: &Table, kind: ColumnKind) -> Vec<String> {
    indexes_with_missing(table, kind)
        .into_iter()
        .filter_map(|idx| table.schema.fields.get(idx))
        .map(|f| f.name.clone())
        .collect()
}

/// `(column, missing)` for every column with missing cells, largest count first.
///
/// Ties keep schema order.
pub fn missing_by_column(table: &Table) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = table
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, f)| (f.name.clone(), missing_in(table, idx)))
        .filter(|(_, missing)| *missing > 0)
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Missing-versus-present breakdown for every column that has missing cells.
pub fn fill_breakdown(table: &Table) -> Vec<ColumnStatistics> {
    table
        .column_names()
        .filter_map(|name| column_statistics(table, name))
        .filter(|s| s.missing > 0)
        .collect()
}

/// Descriptive statistics for every numeric column, in schema order.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    indexes_of_kind(table, ColumnKind::Numeric)
        .into_iter()
        .filter_map(|idx| {
            let field = table.schema.fields.get(idx)?;
            let mut values = present_numbers(table, idx);
            values.sort_by(f64::total_cmp);
            let mean = mean(&values);
            Some(ColumnSummary {
                column: field.name.clone(),
                count: values.len(),
                mean,
                std: sample_std(&values, mean),
                min: values.first().copied(),
                q25: quantile_sorted(&values, 0.25),
                median: quantile_sorted(&values, 0.5),
                q75: quantile_sorted(&values, 0.75),
                max: values.last().copied(),
            })
        })
        .collect()
}

pub(crate) fn missing_in(table: &Table, idx: usize) -> usize {
    table.column_values(idx).filter(|v| v.is_missing()).count()
}

pub(crate) fn indexes_with_missing(table: &Table, kind: ColumnKind) -> Vec<usize> {
    indexes_of_kind(table, kind)
        .into_iter()
        .filter(|&idx| missing_in(table, idx) > 0)
        .collect()
}

/// Number of rows that repeat an earlier row.
pub(crate) fn duplicate_row_count(table: &Table) -> usize {
    let mut seen: HashSet<RowKey<'_>> = HashSet::with_capacity(table.row_count());
    table
        .rows
        .iter()
        .filter(|row| !seen.insert(RowKey::of(row)))
        .count()
}

/// Present values of a numeric column, in row order.
pub(crate) fn present_numbers(table: &Table, idx: usize) -> Vec<f64> {
    table.column_values(idx).filter_map(Value::as_f64).collect()
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of unsorted values (mean of the two middle values for an even count).
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

/// Linear-interpolated quantile over already sorted values.
fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let (a, b) = (*sorted.get(lo)?, *sorted.get(hi)?);
    Some(a + (b - a) * (pos - lo as f64))
}

fn sample_std(values: &[f64], mean: Option<f64>) -> Option<f64> {
    let mean = mean?;
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
