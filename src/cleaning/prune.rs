//! Row and column removal.

use std::collections::HashSet;

use crate::statistics::missing_in;
use crate::types::{RowKey, Table};

use super::{OperationOutcome, OperationReport};

/// Keep the first occurrence of each distinct row; later copies are removed.
///
/// Rows compare equal when every cell is equal, with missing equal to missing. Idempotent.
pub fn drop_duplicate_rows(table: &Table) -> OperationOutcome {
    let mut seen: HashSet<RowKey<'_>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = table
        .rows
        .iter()
        .map(|row| seen.insert(RowKey::of(row)))
        .collect();

    let mut flags = keep.iter();
    let out = table.filter_rows(|_| flags.next().copied().unwrap_or(true));
    rows_removed(table, out)
}

/// Remove every row containing at least one missing cell.
pub fn drop_rows_with_missing(table: &Table) -> OperationOutcome {
    let out = table.filter_rows(|row| !row.iter().any(|v| v.is_missing()));
    rows_removed(table, out)
}

/// Remove every column containing at least one missing cell.
pub fn drop_columns_with_missing(table: &Table) -> OperationOutcome {
    let (keep, dropped): (Vec<usize>, Vec<usize>) =
        (0..table.column_count()).partition(|&idx| missing_in(table, idx) == 0);

    let columns = dropped
        .iter()
        .filter_map(|&idx| table.schema.fields.get(idx))
        .map(|f| f.name.clone())
        .collect();

    OperationOutcome {
        table: table.select_columns(&keep),
        report: OperationReport {
            columns,
            columns_removed: dropped.len(),
            ..Default::default()
        },
    }
}

fn rows_removed(before: &Table, after: Table) -> OperationOutcome {
    OperationOutcome {
        report: OperationReport {
            rows_removed: before.row_count() - after.row_count(),
            ..Default::default()
        },
        table: after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn table() -> Table {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("age", DataType::Int64),
            Field::new("city", DataType::Utf8),
        ]);
        Table::new(
            schema,
            vec![
                vec![s("a"), Value::Int64(1), s("x")],
                vec![s("b"), Value::Null, s("y")],
                vec![s("a"), Value::Int64(1), s("x")],
                vec![s("b"), Value::Null, s("y")],
                vec![s("c"), Value::Int64(3), s("z")],
            ],
        )
    }

    #[test]
    fn drop_duplicates_keeps_first_occurrences_in_order() {
        let out = drop_duplicate_rows(&table());
        assert_eq!(out.report.rows_removed, 2);
        assert_eq!(
            out.table.rows,
            vec![
                vec![s("a"), Value::Int64(1), s("x")],
                vec![s("b"), Value::Null, s("y")],
                vec![s("c"), Value::Int64(3), s("z")],
            ]
        );
    }

    #[test]
    fn drop_duplicates_is_idempotent() {
        let once = drop_duplicate_rows(&table()).table;
        let twice = drop_duplicate_rows(&once);
        assert_eq!(twice.table, once);
        assert_eq!(twice.report.rows_removed, 0);
    }

    #[test]
    fn drop_rows_with_any_missing() {
        let out = drop_rows_with_missing(&table());
        assert_eq!(out.table.row_count(), 3);
        assert!(out.table.rows.iter().flatten().all(|v| !v.is_missing()));
        assert_eq!(out.report.rows_removed, 2);
    }

    #[test]
    fn drop_columns_with_any_missing_preserves_order() {
        let out = drop_columns_with_missing(&table());
        assert_eq!(out.table.column_names().collect::<Vec<_>>(), vec!["name", "city"]);
        assert_eq!(out.table.row_count(), 5);
        assert_eq!(out.report.columns, vec!["age"]);
        assert_eq!(out.report.columns_removed, 1);
    }
}
