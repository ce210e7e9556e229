//! Column type inference and missing-marker handling for untyped (text) sources.
//!
//! A column is numeric iff every non-missing cell parses as a number: `Int64` when every cell
//! parses as an `i64`, otherwise `Float64`. Any other column is `Utf8`. A column with no present
//! cells at all is typed `Float64`.

use crate::types::{DataType, Value};

/// Raw cell spellings that mean "missing".
///
/// An empty field is always missing. Markers are compared against the trimmed cell,
/// case-sensitively. A whitespace-only field that matches no marker is present text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMarkers {
    markers: Vec<String>,
}

impl MissingMarkers {
    /// Use exactly `markers` (plus the always-missing empty cell).
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// Only empty cells are missing.
    pub fn empty_only() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// `true` if `raw` should be read as a missing cell.
    pub fn is_missing(&self, raw: &str) -> bool {
        if raw.is_empty() {
            return true;
        }
        let trimmed = raw.trim();
        self.markers.iter().any(|m| m == trimmed)
    }
}

impl Default for MissingMarkers {
    fn default() -> Self {
        Self::new(["NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>"])
    }
}

/// Infer the [`DataType`] of a column from its raw cells.
pub fn infer_data_type<'a, I>(cells: I, markers: &MissingMarkers) -> DataType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut all_int = true;
    let mut seen_present = false;
    for raw in cells {
        if markers.is_missing(raw) {
            continue;
        }
        seen_present = true;
        let trimmed = raw.trim();
        if all_int && trimmed.parse::<i64>().is_ok() {
            continue;
        }
        all_int = false;
        if trimmed.parse::<f64>().is_err() {
            return DataType::Utf8;
        }
    }
    if seen_present && all_int {
        DataType::Int64
    } else {
        DataType::Float64
    }
}

/// Convert a raw cell of a column whose type came from [`infer_data_type`].
///
/// Text cells are kept verbatim (not trimmed). A numeric cell that does not parse (only possible
/// if the type was not inferred from these cells) is read as missing.
pub fn parse_inferred(raw: &str, data_type: DataType, markers: &MissingMarkers) -> Value {
    if markers.is_missing(raw) {
        return Value::Null;
    }
    let trimmed = raw.trim();
    match data_type {
        DataType::Int64 => trimmed.parse().map_or(Value::Null, Value::Int64),
        DataType::Float64 => trimmed.parse().map_or(Value::Null, Value::Float64),
        DataType::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Null,
        },
        DataType::Utf8 => Value::Utf8(raw.to_string()),
    }
}

/// Make header names unique by suffixing repeats with `.1`, `.2`, ...
pub fn dedupe_headers<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in headers {
        let mut candidate = name.to_string();
        let mut n = 0;
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_int_float_and_text() {
        let m = MissingMarkers::default();
        assert_eq!(infer_data_type(["1", " 2", "", "NA"], &m), DataType::Int64);
        assert_eq!(infer_data_type(["1", "2.5", "3"], &m), DataType::Float64);
        assert_eq!(infer_data_type(["1", "two"], &m), DataType::Utf8);
        assert_eq!(infer_data_type(["1.5", "x", "2"], &m), DataType::Utf8);
    }

    #[test]
    fn all_missing_column_is_float() {
        let m = MissingMarkers::default();
        assert_eq!(infer_data_type(["", "NA"], &m), DataType::Float64);
        assert_eq!(infer_data_type(std::iter::empty(), &m), DataType::Float64);
    }

    #[test]
    fn markers_are_configurable() {
        let m = MissingMarkers::empty_only();
        assert!(m.is_missing(""));
        assert!(!m.is_missing("NA"));
        assert_eq!(infer_data_type(["1", "NA"], &m), DataType::Utf8);

        let m = MissingMarkers::new(["?"]);
        assert!(m.is_missing(" ? "));
    }

    #[test]
    fn whitespace_only_cell_is_present_text() {
        let m = MissingMarkers::default();
        assert!(!m.is_missing("   "));
        assert!(m.is_missing(" NA "));
        assert_eq!(infer_data_type(["a", "   "], &m), DataType::Utf8);
        assert_eq!(
            parse_inferred("   ", DataType::Utf8, &m),
            Value::Utf8("   ".to_string())
        );
    }

    #[test]
    fn text_is_kept_verbatim() {
        let m = MissingMarkers::default();
        assert_eq!(
            parse_inferred("  padded ", DataType::Utf8, &m),
            Value::Utf8("  padded ".to_string())
        );
        assert_eq!(parse_inferred(" 7 ", DataType::Int64, &m), Value::Int64(7));
        assert_eq!(parse_inferred("N/A", DataType::Float64, &m), Value::Null);
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        assert_eq!(
            dedupe_headers(["a", "b", "a", "a", "a.1"]),
            vec!["a", "b", "a.1", "a.2", "a.1.1"]
        );
    }
}
