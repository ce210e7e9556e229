//! Missing-value fill strategies.
//!
//! A fill only touches columns of its own kind that currently have missing cells (see
//! [`crate::statistics::columns_with_missing`]), and computes each fill value from that column's
//! own present values.
//!
//! Every per-column fill value is resolved before the table is copied, so a strategy that fails
//! on any column (malformed literal, mean of nothing) returns an error without producing a
//! partially filled table.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::error::{CleaningError, CleaningResult};
use crate::statistics::{indexes_with_missing, mean, median, present_numbers};
use crate::types::{CellKey, ColumnKind, DataType, Table, Value};

use super::{OperationOutcome, OperationReport};

/// Placeholder written by text fills that need a value but have none to compute from.
pub const UNKNOWN_TEXT: &str = "Unknown";

/// Fill strategies for numeric columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericFill {
    /// Arithmetic mean of present values.
    Mean,
    /// Median of present values.
    Median,
    /// Most frequent present value, `0` if there is none.
    Mode,
    /// Nearest preceding present value.
    ForwardFill,
    /// Nearest following present value.
    BackwardFill,
    /// Caller-supplied literal; must parse as a real number.
    Value(String),
}

impl fmt::Display for NumericFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericFill::Mean => f.write_str("Fill with Mean"),
            NumericFill::Median => f.write_str("Fill with Median"),
            NumericFill::Mode => f.write_str("Fill with Mode"),
            NumericFill::ForwardFill => f.write_str("Forward Fill"),
            NumericFill::BackwardFill => f.write_str("Backward Fill"),
            NumericFill::Value(v) => write!(f, "Fill with Custom Value ({v})"),
        }
    }
}

/// Fill strategies for text columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFill {
    /// Most frequent present value, [`UNKNOWN_TEXT`] if there is none.
    Mode,
    /// The literal [`UNKNOWN_TEXT`].
    Unknown,
    /// The empty string.
    EmptyString,
    /// Caller-supplied literal.
    Value(String),
    /// Nearest preceding present value.
    ForwardFill,
    /// Nearest following present value.
    BackwardFill,
}

impl fmt::Display for TextFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFill::Mode => f.write_str("Fill with Mode"),
            TextFill::Unknown => write!(f, "Fill with '{UNKNOWN_TEXT}'"),
            TextFill::EmptyString => f.write_str("Fill with Empty String"),
            TextFill::Value(v) => write!(f, "Fill with Custom Input ({v})"),
            TextFill::ForwardFill => f.write_str("Forward Fill"),
            TextFill::BackwardFill => f.write_str("Backward Fill"),
        }
    }
}

/// How one column gets filled.
#[derive(Debug, Clone, PartialEq)]
enum ColumnPlan {
    Constant(Value),
    Forward,
    Backward,
}

/// Fill missing cells of every numeric column that has any.
///
/// `Int64` columns stay `Int64` when the fill value is integral; otherwise the column is widened
/// to `Float64`.
///
/// # Errors
///
/// - [`CleaningError::Validation`] if a [`NumericFill::Value`] literal is not a finite number.
/// - [`CleaningError::Computation`] for `Mean`/`Median` on a column with no present values.
pub fn fill_numeric(table: &Table, strategy: &NumericFill) -> CleaningResult<OperationOutcome> {
    let literal = match strategy {
        NumericFill::Value(raw) => Some(parse_numeric_literal(raw)?),
        _ => None,
    };

    let mut plans = Vec::new();
    for idx in indexes_with_missing(table, ColumnKind::Numeric) {
        let plan = match strategy {
            NumericFill::Mean => {
                ColumnPlan::Constant(Value::Float64(required(table, idx, "mean", mean)?))
            }
            NumericFill::Median => {
                ColumnPlan::Constant(Value::Float64(required(table, idx, "median", median)?))
            }
            NumericFill::Mode => ColumnPlan::Constant(
                mode(table, idx).unwrap_or_else(|| zero_for(field_type(table, idx))),
            ),
            NumericFill::ForwardFill => ColumnPlan::Forward,
            NumericFill::BackwardFill => ColumnPlan::Backward,
            NumericFill::Value(_) => {
                ColumnPlan::Constant(Value::Float64(literal.unwrap_or_default()))
            }
        };
        plans.push((idx, plan));
    }

    Ok(execute(table, plans))
}

/// Fill missing cells of every text column that has any.
///
/// Text fills cannot fail; the `Result` keeps the signature uniform with [`fill_numeric`].
pub fn fill_text(table: &Table, strategy: &TextFill) -> CleaningResult<OperationOutcome> {
    let plans = indexes_with_missing(table, ColumnKind::Text)
        .into_iter()
        .map(|idx| {
            let plan = match strategy {
                TextFill::Mode => ColumnPlan::Constant(
                    mode(table, idx).unwrap_or_else(|| Value::Utf8(UNKNOWN_TEXT.to_string())),
                ),
                TextFill::Unknown => ColumnPlan::Constant(Value::Utf8(UNKNOWN_TEXT.to_string())),
                TextFill::EmptyString => ColumnPlan::Constant(Value::Utf8(String::new())),
                TextFill::Value(v) => ColumnPlan::Constant(Value::Utf8(v.clone())),
                TextFill::ForwardFill => ColumnPlan::Forward,
                TextFill::BackwardFill => ColumnPlan::Backward,
            };
            (idx, plan)
        })
        .collect();

    Ok(execute(table, plans))
}

fn parse_numeric_literal(raw: &str) -> CleaningResult<f64> {
    let v = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| CleaningError::Validation {
            message: format!("fill value '{raw}' is not a valid number: {e}"),
        })?;
    if !v.is_finite() {
        return Err(CleaningError::Validation {
            message: format!("fill value '{raw}' is not a finite number"),
        });
    }
    Ok(v)
}

fn required(
    table: &Table,
    idx: usize,
    statistic: &'static str,
    compute: fn(&[f64]) -> Option<f64>,
) -> CleaningResult<f64> {
    compute(&present_numbers(table, idx)).ok_or_else(|| CleaningError::Computation {
        column: column_name(table, idx),
        statistic,
        message: "column has no present values".to_string(),
    })
}

fn column_name(table: &Table, idx: usize) -> String {
    table
        .schema
        .fields
        .get(idx)
        .map(|f| f.name.clone())
        .unwrap_or_default()
}

fn field_type(table: &Table, idx: usize) -> DataType {
    table
        .schema
        .fields
        .get(idx)
        .map_or(DataType::Float64, |f| f.data_type)
}

fn zero_for(data_type: DataType) -> Value {
    match data_type {
        DataType::Int64 => Value::Int64(0),
        _ => Value::Float64(0.0),
    }
}

/// Most frequent present value of a column; ties go to the smallest value.
fn mode(table: &Table, idx: usize) -> Option<Value> {
    let mut counts: HashMap<CellKey<'_>, (usize, &Value)> = HashMap::new();
    for value in table.column_values(idx).filter(|v| !v.is_missing()) {
        counts.entry(CellKey::of(value)).or_insert((0, value)).0 += 1;
    }

    counts
        .into_values()
        .max_by(|(ca, va), (cb, vb)| ca.cmp(cb).then_with(|| compare_values(vb, va)))
        .map(|(_, v)| v.clone())
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int64(x), Value::Int64(y)) => x.cmp(y),
        (Value::Utf8(x), Value::Utf8(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

fn execute(table: &Table, plans: Vec<(usize, ColumnPlan)>) -> OperationOutcome {
    let mut out = table.clone();
    let mut report = OperationReport::default();

    for (idx, plan) in plans {
        let filled = match plan {
            ColumnPlan::Constant(value) => {
                let value = coerce_to_column(&mut out, idx, value);
                fill_constant(&mut out, idx, &value)
            }
            ColumnPlan::Forward => {
                propagate(out.rows.iter_mut().filter_map(|row| row.get_mut(idx)))
            }
            ColumnPlan::Backward => {
                propagate(out.rows.iter_mut().rev().filter_map(|row| row.get_mut(idx)))
            }
        };
        report.columns.push(column_name(&out, idx));
        report.cells_changed += filled;
    }

    OperationOutcome { table: out, report }
}

/// Make `value` fit the column type, widening `Int64` columns for non-integral floats.
fn coerce_to_column(table: &mut Table, idx: usize, value: Value) -> Value {
    let Value::Float64(v) = value else {
        return value;
    };
    match field_type(table, idx) {
        DataType::Int64 if is_integral(v) => Value::Int64(v as i64),
        DataType::Int64 => {
            widen_to_float(table, idx);
            Value::Float64(v)
        }
        _ => Value::Float64(v),
    }
}

fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64
}

fn widen_to_float(table: &mut Table, idx: usize) {
    if let Some(field) = table.schema.fields.get_mut(idx) {
        field.data_type = DataType::Float64;
    }
    for cell in table.rows.iter_mut().filter_map(|row| row.get_mut(idx)) {
        if let Value::Int64(v) = *cell {
            *cell = Value::Float64(v as f64);
        }
    }
}

fn fill_constant(table: &mut Table, idx: usize, value: &Value) -> usize {
    let mut filled = 0;
    for cell in table.rows.iter_mut().filter_map(|row| row.get_mut(idx)) {
        if cell.is_missing() {
            *cell = value.clone();
            filled += 1;
        }
    }
    filled
}

/// Carry the last present value over following missing cells, in iteration order.
///
/// Missing cells before the first present value are left missing.
fn propagate<'a>(cells: impl Iterator<Item = &'a mut Value>) -> usize {
    let mut last: Option<Value> = None;
    let mut filled = 0;
    for cell in cells {
        if !cell.is_missing() {
            last = Some(cell.clone());
        } else if let Some(v) = &last {
            *cell = v.clone();
            filled += 1;
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn single(data_type: DataType, values: Vec<Value>) -> Table {
        let schema = Schema::new(vec![Field::new("c", data_type)]);
        Table::new(schema, values.into_iter().map(|v| vec![v]).collect())
    }

    fn column(t: &Table) -> Vec<Value> {
        t.column_values(0).cloned().collect()
    }

    #[test]
    fn mean_widens_int_column_for_fractional_values() {
        let t = single(
            DataType::Int64,
            vec![Value::Int64(1), Value::Null, Value::Int64(2)],
        );
        let out = fill_numeric(&t, &NumericFill::Mean).unwrap();
        assert_eq!(out.table.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(
            column(&out.table),
            vec![Value::Float64(1.0), Value::Float64(1.5), Value::Float64(2.0)]
        );
        assert_eq!(out.report.cells_changed, 1);
        assert_eq!(out.report.columns, vec!["c"]);
    }

    #[test]
    fn integral_fill_keeps_int_column() {
        let t = single(
            DataType::Int64,
            vec![Value::Int64(1), Value::Null, Value::Int64(3)],
        );
        let out = fill_numeric(&t, &NumericFill::Median).unwrap();
        assert_eq!(out.table.schema.fields[0].data_type, DataType::Int64);
        assert_eq!(column(&out.table)[1], Value::Int64(2));
    }

    #[test]
    fn mean_of_all_missing_column_is_a_computation_error() {
        let t = single(DataType::Float64, vec![Value::Null, Value::Null]);
        for strategy in [NumericFill::Mean, NumericFill::Median] {
            let err = fill_numeric(&t, &strategy).unwrap_err();
            assert!(matches!(err, CleaningError::Computation { ref column, .. } if column == "c"));
        }
    }

    #[test]
    fn failing_column_aborts_whole_fill() {
        let schema = Schema::new(vec![
            Field::new("ok", DataType::Float64),
            Field::new("empty", DataType::Float64),
        ]);
        let t = Table::new(
            schema,
            vec![
                vec![Value::Float64(1.0), Value::Null],
                vec![Value::Null, Value::Null],
            ],
        );
        assert!(fill_numeric(&t, &NumericFill::Mean).is_err());
    }

    #[test]
    fn numeric_mode_prefers_smallest_on_ties_and_defaults_to_zero() {
        let t = single(
            DataType::Int64,
            vec![Value::Int64(5), Value::Int64(3), Value::Null, Value::Int64(5), Value::Int64(3)],
        );
        let out = fill_numeric(&t, &NumericFill::Mode).unwrap();
        assert_eq!(column(&out.table)[2], Value::Int64(3));

        let empty = single(DataType::Int64, vec![Value::Null]);
        let out = fill_numeric(&empty, &NumericFill::Mode).unwrap();
        assert_eq!(column(&out.table), vec![Value::Int64(0)]);

        let empty = single(DataType::Float64, vec![Value::Null]);
        let out = fill_numeric(&empty, &NumericFill::Mode).unwrap();
        assert_eq!(column(&out.table), vec![Value::Float64(0.0)]);
    }

    #[test]
    fn custom_numeric_value_must_parse() {
        let t = single(DataType::Float64, vec![Value::Null]);
        let err = fill_numeric(&t, &NumericFill::Value("twelve".to_string())).unwrap_err();
        assert!(matches!(err, CleaningError::Validation { .. }));

        let out = fill_numeric(&t, &NumericFill::Value(" 12.5 ".to_string())).unwrap();
        assert_eq!(column(&out.table), vec![Value::Float64(12.5)]);
    }

    #[test]
    fn custom_numeric_value_must_be_finite() {
        let t = single(DataType::Float64, vec![Value::Float64(1.0), Value::Null]);
        for raw in ["NaN", "inf", "-infinity", " +Infinity "] {
            let err = fill_numeric(&t, &NumericFill::Value(raw.to_string())).unwrap_err();
            assert!(matches!(err, CleaningError::Validation { .. }), "{raw}");
        }
    }

    #[test]
    fn custom_numeric_value_is_validated_even_without_missing_cells() {
        let t = single(DataType::Float64, vec![Value::Float64(1.0)]);
        assert!(fill_numeric(&t, &NumericFill::Value(String::new())).is_err());
    }

    #[test]
    fn forward_fill_leaves_leading_run_missing() {
        let t = single(
            DataType::Utf8,
            vec![Value::Null, Value::Null, s("a"), Value::Null, s("b"), Value::Null],
        );
        let out = fill_text(&t, &TextFill::ForwardFill).unwrap();
        assert_eq!(
            column(&out.table),
            vec![Value::Null, Value::Null, s("a"), s("a"), s("b"), s("b")]
        );
        assert_eq!(out.report.cells_changed, 2);
    }

    #[test]
    fn backward_fill_leaves_trailing_run_missing() {
        let t = single(
            DataType::Int64,
            vec![Value::Null, Value::Int64(1), Value::Null, Value::Int64(2), Value::Null],
        );
        let out = fill_numeric(&t, &NumericFill::BackwardFill).unwrap();
        assert_eq!(
            column(&out.table),
            vec![Value::Int64(1), Value::Int64(1), Value::Int64(2), Value::Int64(2), Value::Null]
        );
    }

    #[test]
    fn text_constants() {
        let t = single(DataType::Utf8, vec![s("x"), Value::Null]);
        let cases = [
            (TextFill::Unknown, s("Unknown")),
            (TextFill::EmptyString, s("")),
            (TextFill::Value("n/a".to_string()), s("n/a")),
        ];
        for (strategy, expected) in cases {
            let out = fill_text(&t, &strategy).unwrap();
            assert_eq!(column(&out.table), vec![s("x"), expected], "{strategy}");
        }
    }

    #[test]
    fn text_mode_falls_back_to_unknown() {
        let t = single(DataType::Utf8, vec![Value::Null, Value::Null]);
        let out = fill_text(&t, &TextFill::Mode).unwrap();
        assert_eq!(column(&out.table), vec![s("Unknown"), s("Unknown")]);
    }

    #[test]
    fn fills_never_cross_kinds() {
        let schema = Schema::new(vec![
            Field::new("n", DataType::Float64),
            Field::new("t", DataType::Utf8),
            Field::new("b", DataType::Bool),
        ]);
        let t = Table::new(
            schema,
            vec![
                vec![Value::Float64(1.0), s("a"), Value::Bool(true)],
                vec![Value::Null, Value::Null, Value::Null],
            ],
        );

        let numeric = fill_numeric(&t, &NumericFill::Mode).unwrap().table;
        assert_eq!(numeric.rows[1], vec![Value::Float64(1.0), Value::Null, Value::Null]);

        let text = fill_text(&t, &TextFill::Mode).unwrap().table;
        assert_eq!(text.rows[1], vec![Value::Null, s("a"), Value::Null]);
    }

    #[test]
    fn fully_present_columns_are_untouched() {
        let t = single(DataType::Int64, vec![Value::Int64(1), Value::Int64(2)]);
        let out = fill_numeric(&t, &NumericFill::Mean).unwrap();
        assert_eq!(out.table, t);
        assert!(out.report.columns.is_empty());
    }

    fn numeric_strategies() -> Vec<NumericFill> {
        vec![
            NumericFill::Mean,
            NumericFill::Median,
            NumericFill::Mode,
            NumericFill::ForwardFill,
            NumericFill::BackwardFill,
            NumericFill::Value("3".to_string()),
        ]
    }

    fn text_strategies() -> Vec<TextFill> {
        vec![
            TextFill::Mode,
            TextFill::Unknown,
            TextFill::EmptyString,
            TextFill::Value("x".to_string()),
            TextFill::ForwardFill,
            TextFill::BackwardFill,
        ]
    }

    fn pair(rows: Vec<(Value, Value)>) -> Table {
        let schema = Schema::new(vec![
            Field::new("n", DataType::Float64),
            Field::new("t", DataType::Utf8),
        ]);
        Table::new(schema, rows.into_iter().map(|(n, t)| vec![n, t]).collect())
    }

    #[test]
    fn every_strategy_leaves_fully_present_table_alone() {
        let t = pair(vec![
            (Value::Float64(1.0), s("a")),
            (Value::Float64(2.0), s("b")),
        ]);
        for strategy in numeric_strategies() {
            let out = fill_numeric(&t, &strategy).unwrap();
            assert_eq!(out.table, t, "{strategy:?}");
            assert_eq!(out.report.cells_changed, 0, "{strategy:?}");
        }
        for strategy in text_strategies() {
            let out = fill_text(&t, &strategy).unwrap();
            assert_eq!(out.table, t, "{strategy:?}");
            assert_eq!(out.report.cells_changed, 0, "{strategy:?}");
        }
    }

    #[test]
    fn fills_ignore_missing_cells_of_the_other_kind() {
        let text_gap = pair(vec![
            (Value::Float64(1.0), Value::Null),
            (Value::Float64(2.0), s("b")),
        ]);
        for strategy in numeric_strategies() {
            let out = fill_numeric(&text_gap, &strategy).unwrap();
            assert_eq!(out.table, text_gap, "{strategy:?}");
        }

        let numeric_gap = pair(vec![
            (Value::Null, s("a")),
            (Value::Float64(2.0), s("b")),
        ]);
        for strategy in text_strategies() {
            let out = fill_text(&numeric_gap, &strategy).unwrap();
            assert_eq!(out.table, numeric_gap, "{strategy:?}");
        }
    }

    #[test]
    fn all_missing_column_survives_forward_then_backward_fill() {
        let text = single(DataType::Utf8, vec![Value::Null, Value::Null, Value::Null]);
        let forward = fill_text(&text, &TextFill::ForwardFill).unwrap();
        let both = fill_text(&forward.table, &TextFill::BackwardFill).unwrap();
        assert_eq!(both.table, text);
        assert_eq!(forward.report.cells_changed + both.report.cells_changed, 0);

        let numeric = single(DataType::Float64, vec![Value::Null, Value::Null]);
        let forward = fill_numeric(&numeric, &NumericFill::ForwardFill).unwrap();
        let both = fill_numeric(&forward.table, &NumericFill::BackwardFill).unwrap();
        assert_eq!(both.table, numeric);
        assert_eq!(both.table.schema.fields[0].data_type, DataType::Float64);
    }
}
