//! Unified ingestion entrypoints.
//!
//! - [`ingest_from_path`] reads a file; if [`IngestionOptions::format`] is `None` the format is
//!   inferred from the file extension.
//! - [`ingest_from_bytes`] reads an in-memory upload; the format defaults to CSV.
//!
//! Both accept an optional [`Schema`]. Without one, column types are inferred. If an
//! [`IngestionObserver`] is configured, success/failure/alerts are reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::statistics::dataset_statistics;
use crate::types::{Schema, Table};

use crate::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

use super::infer::MissingMarkers;
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Delimited text with a header row.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect from the file extension (paths) or use CSV (bytes).
    pub format: Option<IngestionFormat>,
    /// Field delimiter for CSV input. `None` means `,`, or a tab for `.tsv` paths.
    pub delimiter: Option<u8>,
    /// Cell spellings read as missing.
    pub missing_markers: MissingMarkers,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("delimiter", &self.delimiter)
            .field("missing_markers", &self.missing_markers)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            delimiter: None,
            missing_markers: MissingMarkers::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Ingest a file into a [`Table`].
///
/// With `schema`, every declared column must be present and parse as its type; without one,
/// columns and types are inferred.
///
/// # Examples
///
/// ```no_run
/// use rust_data_cleaning::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), rust_data_cleaning::IngestionError> {
/// let table = ingest_from_path("people.csv", None, &IngestionOptions::default())?;
/// println!("rows={} columns={}", table.row_count(), table.column_count());
/// # Ok(())
/// # }
/// ```
///
/// Observability (stderr logging + alert threshold):
///
/// ```no_run
/// use std::sync::Arc;
///
/// use rust_data_cleaning::ingestion::{ingest_from_path, IngestionOptions};
/// use rust_data_cleaning::observability::{IngestionSeverity, StdErrObserver};
///
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(StdErrObserver::default())),
///     alert_at_or_above: IngestionSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = ingest_from_path("does_not_exist.csv", None, &opts).unwrap_err();
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: Option<&Schema>,
    options: &IngestionOptions,
) -> IngestionResult<Table> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };
    let is_tsv = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    let delimiter = options
        .delimiter
        .unwrap_or(if is_tsv { b'\t' } else { b',' });

    let ctx = IngestionContext {
        source: path.display().to_string(),
        format: fmt,
    };

    let result = std::fs::read(path)
        .map_err(IngestionError::from)
        .and_then(|bytes| ingest_bytes_as(&bytes, fmt, delimiter, schema, options));

    report(options, &ctx, &result);
    result
}

/// Ingest an in-memory upload into a [`Table`].
///
/// `label` only identifies the upload in observer callbacks.
pub fn ingest_from_bytes(
    bytes: &[u8],
    label: &str,
    schema: Option<&Schema>,
    options: &IngestionOptions,
) -> IngestionResult<Table> {
    let fmt = options.format.unwrap_or(IngestionFormat::Csv);
    let ctx = IngestionContext {
        source: label.to_string(),
        format: fmt,
    };

    let result = ingest_bytes_as(bytes, fmt, options.delimiter.unwrap_or(b','), schema, options);

    report(options, &ctx, &result);
    result
}

fn ingest_bytes_as(
    bytes: &[u8],
    fmt: IngestionFormat,
    delimiter: u8,
    schema: Option<&Schema>,
    options: &IngestionOptions,
) -> IngestionResult<Table> {
    match fmt {
        IngestionFormat::Csv => {
            let mut rdr = csv::reader_from_bytes(bytes, delimiter);
            match schema {
                Some(schema) => csv::ingest_csv_from_reader(&mut rdr, schema, &options.missing_markers),
                None => csv::infer_csv_from_reader(&mut rdr, &options.missing_markers),
            }
        }
        IngestionFormat::Json => {
            let text = std::str::from_utf8(bytes).map_err(|e| IngestionError::SchemaMismatch {
                message: format!("json input is not valid utf-8: {e}"),
            })?;
            match schema {
                Some(schema) => json::ingest_json_from_str(text, schema),
                None => json::infer_json_from_str(text),
            }
        }
    }
}

fn report(options: &IngestionOptions, ctx: &IngestionContext, result: &IngestionResult<Table>) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match result {
        Ok(table) => obs.on_success(
            ctx,
            IngestionStats {
                rows: table.row_count(),
                columns: table.column_count(),
                missing_cells: dataset_statistics(table).total_missing,
            },
        ),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ if error_chain_contains_io(err) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::SchemaMismatch { .. } => IngestionSeverity::Error,
        IngestionError::ParseError { .. } => IngestionSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}
