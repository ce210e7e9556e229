//! Core data model types.
//!
//! A [`Table`] is an ordered list of typed columns (its [`Schema`]) plus row-major cell storage.
//! Every cell is a [`Value`]; [`Value::Null`] is the missing marker.

use serde::Serialize;

/// Physical data type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// The semantic kind used to route cleaning operations.
    pub fn kind(self) -> ColumnKind {
        match self {
            DataType::Int64 | DataType::Float64 => ColumnKind::Numeric,
            DataType::Utf8 => ColumnKind::Text,
            DataType::Bool => ColumnKind::Other,
        }
    }
}

/// Semantic column kind.
///
/// Kinds are fixed when a column is typed (at ingestion or construction) and are never
/// re-inferred from cell contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// `Int64` or `Float64` columns.
    Numeric,
    /// `Utf8` columns.
    Text,
    /// Everything else (currently `Bool`).
    Other,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Shorthand for `self.data_type.kind()`.
    pub fn kind(&self) -> ColumnKind {
        self.data_type.kind()
    }
}

/// Ordered list of fields describing the shape of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for [`Value::Null`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value (`Int64` and `Float64` only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of the value (`Utf8` only).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }
}

/// Hashable identity of one cell, used for duplicate detection and mode counting.
///
/// Missing equals missing; floats compare by bit pattern after folding `-0.0` into `0.0` and all
/// NaNs into one NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum CellKey<'a> {
    Missing,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> CellKey<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Null => CellKey::Missing,
            Value::Int64(v) => CellKey::Int(*v),
            Value::Float64(v) => CellKey::Float(canonical_bits(*v)),
            Value::Bool(v) => CellKey::Bool(*v),
            Value::Utf8(s) => CellKey::Text(s.as_str()),
        }
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Borrowed key for a whole row; two rows are duplicates iff their keys are equal.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct RowKey<'a>(Vec<CellKey<'a>>);

impl<'a> RowKey<'a> {
    pub(crate) fn of(row: &'a [Value]) -> Self {
        Self(row.iter().map(CellKey::of).collect())
    }
}

/// In-memory table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. `Clone` is
/// a deep copy of all cell data.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row has a different length than the schema field count.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        let width = schema.fields.len();
        for (idx, row) in rows.iter().enumerate() {
            assert!(
                row.len() == width,
                "row {idx} has {} cells but schema has {width} fields",
                row.len()
            );
        }
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.schema.field_names()
    }

    /// Declared kind of a column, if it exists.
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.schema
            .index_of(column)
            .and_then(|idx| self.schema.fields.get(idx))
            .map(Field::kind)
    }

    /// Values of the column at `idx`, in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Values of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        self.schema.index_of(name).map(|idx| self.column_values(idx))
    }

    /// `true` if every cell of rows `a` and `b` is equal (missing equals missing).
    ///
    /// Out-of-range indexes compare unequal.
    pub fn rows_equal(&self, a: usize, b: usize) -> bool {
        match (self.rows.get(a), self.rows.get(b)) {
            (Some(ra), Some(rb)) => RowKey::of(ra) == RowKey::of(rb),
            _ => false,
        }
    }

    /// The first `n` rows as a new table.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new table by applying `mapper` to every row.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new table keeping only the columns at `keep` (in the given order).
    pub fn select_columns(&self, keep: &[usize]) -> Self {
        let fields = keep
            .iter()
            .filter_map(|&idx| self.schema.fields.get(idx).cloned())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().filter_map(|&idx| row.get(idx).cloned()).collect())
            .collect();
        Self {
            schema: Schema::new(fields),
            rows,
        }
    }
}
