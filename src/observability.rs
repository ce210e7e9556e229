//! Observer hooks for ingestion outcomes and cleaning-session events.
//!
//! Nothing in the crate logs through a global logger. Instead callers attach observers:
//!
//! - [`IngestionObserver`] via [`crate::ingestion::IngestionOptions::observer`]
//! - [`SessionObserver`] via [`crate::session::SessionOptions::observer`]
//!
//! [`StdErrObserver`] and [`FileObserver`] implement both traits; [`CompositeObserver`] fans out
//! to any number of either kind.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cleaning::OperationReport;
use crate::error::IngestionError;
use crate::ingestion::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Where the data came from: a file path, or a caller-supplied label for in-memory bytes.
    pub source: String,
    /// Format used for ingestion.
    pub format: IngestionFormat,
}

/// Stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub rows: usize,
    pub columns: usize,
    /// Cells read as missing, across all columns.
    pub missing_cells: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Events emitted by a [`crate::session::CleaningSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A new dataset replaced both tables.
    Loaded { source: String, rows: usize, columns: usize },
    /// `load` was called again with the identity already loaded.
    LoadSkipped { source: String },
    /// An operation succeeded and replaced the working table.
    Applied {
        operation: String,
        report: OperationReport,
        rows: usize,
        columns: usize,
    },
    /// An operation failed; the working table is unchanged.
    ApplyFailed { operation: String, error: String },
    /// The working table was restored from the original.
    Reset { rows: usize, columns: usize },
    /// The working table was serialized.
    Exported { rows: usize, bytes: usize },
}

/// Observer hook for session events.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// An observer that fans out callbacks to a list of observers.
///
/// `CompositeObserver<dyn IngestionObserver>` is an [`IngestionObserver`];
/// `CompositeObserver<dyn SessionObserver>` is a [`SessionObserver`].
pub struct CompositeObserver<O: ?Sized> {
    observers: Vec<Arc<O>>,
}

impl<O: ?Sized> CompositeObserver<O> {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<O>>) -> Self {
        Self { observers }
    }
}

impl<O: ?Sized> Default for CompositeObserver<O> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
        }
    }
}

impl<O: ?Sized> fmt::Debug for CompositeObserver<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver<dyn IngestionObserver> {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

impl SessionObserver for CompositeObserver<dyn SessionObserver> {
    fn on_event(&self, event: &SessionEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!(
            "[ingest][ok] format={:?} source={} rows={} columns={} missing={}",
            ctx.format, ctx.source, stats.rows, stats.columns, stats.missing_cells
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ingest][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ALERT][ingest][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }
}

impl SessionObserver for StdErrObserver {
    fn on_event(&self, event: &SessionEvent) {
        eprintln!("[session] {event:?}");
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line(&format!(
            "ingest ok format={:?} source={} rows={} columns={} missing={}",
            ctx.format, ctx.source, stats.rows, stats.columns, stats.missing_cells
        ));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "ingest fail severity={:?} format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        ));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "ingest ALERT severity={:?} format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        ));
    }
}

impl SessionObserver for FileObserver {
    fn on_event(&self, event: &SessionEvent) {
        let line = match event {
            SessionEvent::Loaded { source, rows, columns } => {
                format!("session loaded source={source} rows={rows} columns={columns}")
            }
            SessionEvent::LoadSkipped { source } => {
                format!("session load-skipped source={source}")
            }
            SessionEvent::Applied {
                operation,
                report,
                rows,
                columns,
            } => format!(
                "session applied op=\"{operation}\" changed={} rows_removed={} columns_removed={} rows={rows} columns={columns}",
                report.cells_changed, report.rows_removed, report.columns_removed
            ),
            SessionEvent::ApplyFailed { operation, error } => {
                format!("session apply-failed op=\"{operation}\" err={error}")
            }
            SessionEvent::Reset { rows, columns } => {
                format!("session reset rows={rows} columns={columns}")
            }
            SessionEvent::Exported { rows, bytes } => {
                format!("session exported rows={rows} bytes={bytes}")
            }
        };
        self.append_line(&line);
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
