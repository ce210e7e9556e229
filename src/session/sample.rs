//! Built-in demonstration dataset.
//!
//! Nine employee records with deliberately planted problems: two missing names, two missing ages,
//! one missing city, one missing department, one exact duplicate row, and inconsistent casing and
//! padding in the text columns.

use crate::types::{DataType, Field, Schema, Table, Value};

/// Column names of the sample dataset, in order.
pub const SAMPLE_COLUMNS: [&str; 5] = ["Name", "Age", "City", "Salary", "Department"];

/// Build the sample dataset.
pub fn sample_table() -> Table {
    let schema = Schema::new(vec![
        Field::new("Name", DataType::Utf8),
        Field::new("Age", DataType::Int64),
        Field::new("City", DataType::Utf8),
        Field::new("Salary", DataType::Int64),
        Field::new("Department", DataType::Utf8),
    ]);

    let records: [(Option<&str>, Option<i64>, Option<&str>, i64, Option<&str>); 9] = [
        (Some("JOHN DOE"), Some(25), Some("NEW YORK"), 50_000, Some("Sales")),
        (Some("jane smith"), Some(30), Some("los angeles"), 60_000, Some("Marketing")),
        (None, Some(35), Some("Chicago"), 55_000, Some("IT")),
        (Some("Bob Johnson"), Some(28), Some("  Houston "), 70_000, Some("Sales")),
        (Some("JOHN DOE"), Some(25), Some("NEW YORK"), 50_000, Some("Sales")),
        (Some("alice BROWN"), None, None, 65_000, Some("Engineering")),
        (Some("charlie davis"), Some(45), Some("Boston"), 80_000, Some("Marketing")),
        (None, None, Some("Denver "), 58_000, None),
        (Some("  Eve Wilson"), Some(32), Some("Miami"), 62_000, Some("HR")),
    ];

    let text = |v: Option<&str>| v.map_or(Value::Null, |s| Value::Utf8(s.to_string()));
    let rows = records
        .into_iter()
        .map(|(name, age, city, salary, dept)| {
            vec![
                text(name),
                age.map_or(Value::Null, Value::Int64),
                text(city),
                Value::Int64(salary),
                text(dept),
            ]
        })
        .collect();

    Table::new(schema, rows)
}

#[cfg(test)]
mod tests {
    use super::{sample_table, SAMPLE_COLUMNS};
    use crate::statistics::{column_statistics, dataset_statistics};

    #[test]
    fn sample_has_planted_problems() {
        let t = sample_table();
        assert_eq!(t.column_names().collect::<Vec<_>>(), SAMPLE_COLUMNS);
        assert_eq!(t.shape(), (9, 5));

        let stats = dataset_statistics(&t);
        assert_eq!(stats.numeric_missing, 2);
        assert_eq!(stats.text_missing, 4);
        assert_eq!(stats.total_missing, 6);
        assert_eq!(stats.duplicate_rows, 1);

        assert_eq!(column_statistics(&t, "Name").unwrap().missing, 2);
        assert_eq!(column_statistics(&t, "Age").unwrap().missing, 2);
        assert_eq!(column_statistics(&t, "Salary").unwrap().missing, 0);
    }
}
