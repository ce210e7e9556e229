//! Text formatting applied to every text column.

use std::fmt;

use crate::classify::indexes_of_kind;
use crate::types::{ColumnKind, Table, Value};

use super::{OperationOutcome, OperationReport};

/// Formatting applied to all text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Uppercase,
    Lowercase,
    /// First character of each whitespace-delimited word uppercased, the rest lowercased.
    TitleCase,
    /// Remove leading and trailing whitespace; interior whitespace is kept.
    TrimWhitespace,
}

impl TextFormat {
    /// Format a single string.
    pub fn apply(self, input: &str) -> String {
        match self {
            TextFormat::Uppercase => input.to_uppercase(),
            TextFormat::Lowercase => input.to_lowercase(),
            TextFormat::TitleCase => title_case(input),
            TextFormat::TrimWhitespace => input.trim().to_string(),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextFormat::Uppercase => "Uppercase",
            TextFormat::Lowercase => "Lowercase",
            TextFormat::TitleCase => "Title Case",
            TextFormat::TrimWhitespace => "Strip Whitespace",
        })
    }
}

/// Apply `format` to every cell of every text column.
///
/// Missing cells stay missing.
pub fn format_text(table: &Table, format: TextFormat) -> OperationOutcome {
    let mut out = table.clone();
    let mut report = OperationReport::default();

    for idx in indexes_of_kind(table, ColumnKind::Text) {
        for cell in out.rows.iter_mut().filter_map(|row| row.get_mut(idx)) {
            if let Value::Utf8(s) = cell {
                let formatted = format.apply(s);
                if formatted != *s {
                    *s = formatted;
                    report.cells_changed += 1;
                }
            }
        }
        if let Some(field) = out.schema.fields.get(idx) {
            report.columns.push(field.name.clone());
        }
    }

    OperationOutcome { table: out, report }
}

fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_whitespace() {
            out.push(c);
            at_word_start = true;
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
