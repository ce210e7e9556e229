//! Cleaning operations over a [`crate::types::Table`].
//!
//! Every operation borrows a table and returns a new one; the input is never mutated. That is
//! what lets [`crate::session::CleaningSession::apply`] keep its working table unchanged when an
//! operation fails.
//!
//! Currently implemented:
//!
//! - [`fill_numeric()`] / [`fill_text()`]: missing-value fills per column kind
//! - [`format_text()`]: case and whitespace normalization of all text columns
//! - [`drop_duplicate_rows()`], [`drop_rows_with_missing()`], [`drop_columns_with_missing()`]
//!
//! [`apply_operation`] dispatches a [`CleaningOperation`] value to the right function.
//!
//! ## Example: fill → format → dedupe
//!
//! ```rust
//! use rust_data_cleaning::cleaning::{apply_operation, CleaningOperation, NumericFill, TextFill, TextFormat};
//! use rust_data_cleaning::types::{DataType, Field, Schema, Table, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Utf8),
//!     Field::new("age", DataType::Int64),
//! ]);
//! let t = Table::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("ada".to_string()), Value::Int64(30)],
//!         vec![Value::Null, Value::Null],
//!         vec![Value::Utf8("ada".to_string()), Value::Int64(30)],
//!     ],
//! );
//!
//! let t = apply_operation(&t, &CleaningOperation::FillText(TextFill::Mode))?.table;
//! let t = apply_operation(&t, &CleaningOperation::FillNumeric(NumericFill::Mean))?.table;
//! let t = apply_operation(&t, &CleaningOperation::Format(TextFormat::TitleCase))?.table;
//! let out = apply_operation(&t, &CleaningOperation::DropDuplicateRows)?;
//!
//! assert_eq!(out.report.rows_removed, 2);
//! assert_eq!(out.table.rows, vec![vec![Value::Utf8("Ada".to_string()), Value::Int64(30)]]);
//! # Ok::<(), rust_data_cleaning::CleaningError>(())
//! ```

pub mod fill;
pub mod format;
pub mod prune;

use std::fmt;

use serde::Serialize;

use crate::error::CleaningResult;
use crate::types::Table;

pub use fill::{fill_numeric, fill_text, NumericFill, TextFill, UNKNOWN_TEXT};
pub use format::{format_text, TextFormat};
pub use prune::{drop_columns_with_missing, drop_duplicate_rows, drop_rows_with_missing};

/// A single user-selectable cleaning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleaningOperation {
    /// Fill missing cells in numeric columns.
    FillNumeric(NumericFill),
    /// Fill missing cells in text columns.
    FillText(TextFill),
    /// Format every text column.
    Format(TextFormat),
    /// Remove repeated rows, keeping first occurrences.
    DropDuplicateRows,
    /// Remove rows with any missing cell.
    DropRowsWithMissing,
    /// Remove columns with any missing cell.
    DropColumnsWithMissing,
}

impl fmt::Display for CleaningOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleaningOperation::FillNumeric(s) => write!(f, "{s} (numeric columns)"),
            CleaningOperation::FillText(s) => write!(f, "{s} (text columns)"),
            CleaningOperation::Format(s) => write!(f, "{s} (all text columns)"),
            CleaningOperation::DropDuplicateRows => f.write_str("Drop Duplicate Rows"),
            CleaningOperation::DropRowsWithMissing => f.write_str("Drop Rows With Missing Values"),
            CleaningOperation::DropColumnsWithMissing => {
                f.write_str("Drop Columns With Missing Values")
            }
        }
    }
}

/// What an operation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    /// Columns the operation filled, formatted, or removed.
    pub columns: Vec<String>,
    /// Cells whose value changed.
    pub cells_changed: usize,
    /// Rows dropped by a pruning operation.
    pub rows_removed: usize,
    /// Columns dropped by a pruning operation.
    pub columns_removed: usize,
}

/// Result of a successful operation: the new table and a report of what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    /// The table after the operation. The input table is never modified.
    pub table: Table,
    /// Summary of what changed between the input and [`OperationOutcome::table`].
    pub report: OperationReport,
}

/// Run `operation` against `table`, returning the updated table.
///
/// # Errors
///
/// Only numeric fills can fail; see [`fill_numeric`].
pub fn apply_operation(table: &Table, operation: &CleaningOperation) -> CleaningResult<OperationOutcome> {
    match operation {
        CleaningOperation::FillNumeric(strategy) => fill_numeric(table, strategy),
        CleaningOperation::FillText(strategy) => fill_text(table, strategy),
        CleaningOperation::Format(format) => Ok(format_text(table, *format)),
        CleaningOperation::DropDuplicateRows => Ok(drop_duplicate_rows(table)),
        CleaningOperation::DropRowsWithMissing => Ok(drop_rows_with_missing(table)),
        CleaningOperation::DropColumnsWithMissing => Ok(drop_columns_with_missing(table)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_ui_wording() {
        assert_eq!(
            CleaningOperation::FillNumeric(NumericFill::Mean).to_string(),
            "Fill with Mean (numeric columns)"
        );
        assert_eq!(
            CleaningOperation::FillText(TextFill::Unknown).to_string(),
            "Fill with 'Unknown' (text columns)"
        );
        assert_eq!(
            CleaningOperation::Format(TextFormat::TrimWhitespace).to_string(),
            "Strip Whitespace (all text columns)"
        );
        assert_eq!(CleaningOperation::DropDuplicateRows.to_string(), "Drop Duplicate Rows");
    }
}
