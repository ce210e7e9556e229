//! Column classification by declared kind.
//!
//! Classification only filters on the [`ColumnKind`] fixed at load time; cell contents are never
//! inspected.

use crate::types::{ColumnKind, Table};

/// Names of columns whose declared kind is `kind`, in schema order.
pub fn columns_of_kind(table: &Table, kind: ColumnKind) -> Vec<String> {
    table
        .schema
        .fields
        .iter()
        .filter(|f| f.kind() == kind)
        .map(|f| f.name.clone())
        .collect()
}

/// Names of numeric columns, in schema order.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    columns_of_kind(table, ColumnKind::Numeric)
}

/// Names of text columns, in schema order.
pub fn text_columns(table: &Table) -> Vec<String> {
    columns_of_kind(table, ColumnKind::Text)
}

/// Schema indexes of columns whose declared kind is `kind`.
pub(crate) fn indexes_of_kind(table: &Table, kind: ColumnKind) -> Vec<usize> {
    table
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.kind() == kind)
        .map(|(idx, _)| idx)
        .collect()
}
