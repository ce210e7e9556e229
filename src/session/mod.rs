//! The cleaning session: an immutable original table, a working table that cleaning operations
//! replace, and the identity of the source they were loaded from.
//!
//! A session starts empty. Loading a source puts independent copies of the data in both slots;
//! loading the same [`SourceIdentity`] again is a no-op, so a host that re-runs its load step on
//! every interaction does not wipe the user's edits. [`CleaningSession::apply`] runs one
//! [`CleaningOperation`] against the working table and, only on success, replaces it.
//! [`CleaningSession::reset`] copies the original back.
//!
//! ```rust
//! use rust_data_cleaning::cleaning::{CleaningOperation, NumericFill, TextFill};
//! use rust_data_cleaning::session::CleaningSession;
//!
//! let mut session = CleaningSession::new();
//! session.load_sample();
//!
//! session.apply(&CleaningOperation::FillText(TextFill::Mode))?;
//! session.apply(&CleaningOperation::FillNumeric(NumericFill::Mean))?;
//! let report = session.apply(&CleaningOperation::DropDuplicateRows)?;
//!
//! assert_eq!(report.rows_removed, 1);
//! assert_eq!(session.working().map(|t| t.row_count()), Some(8));
//! assert_eq!(session.original().map(|t| t.row_count()), Some(9));
//! # Ok::<(), rust_data_cleaning::CleaningError>(())
//! ```

pub mod sample;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::cleaning::{apply_operation, CleaningOperation, OperationReport};
use crate::error::{CleaningError, CleaningResult};
use crate::export;
use crate::ingestion::{ingest_from_bytes, IngestionOptions};
use crate::observability::{SessionEvent, SessionObserver};
use crate::statistics::{column_statistics, dataset_statistics, ColumnStatistics, DatasetStatistics};
use crate::types::{Schema, Table};

pub use sample::{sample_table, SAMPLE_COLUMNS};

const SAMPLE_IDENTITY: &str = "builtin:sample";

/// Stable token identifying a loaded source.
///
/// Two loads with equal identities are treated as the same source. For uploads, derive it from
/// something the host keeps stable across reruns (an upload id, a file path).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceIdentity(String);

impl SourceIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Identity for a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self(format!("file:{}", path.as_ref().display()))
    }

    /// Reserved identity of the built-in sample dataset.
    pub fn sample() -> Self {
        Self(SAMPLE_IDENTITY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a load call replaced the session's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Both tables were replaced.
    Loaded,
    /// The identity was already loaded; nothing changed.
    AlreadyLoaded,
}

/// Options controlling a [`CleaningSession`].
///
/// Use [`Default`] for common cases.
#[derive(Clone, Default)]
pub struct SessionOptions {
    /// Optional observer for session events.
    pub observer: Option<Arc<dyn SessionObserver>>,
    /// Options used by [`CleaningSession::load_from_bytes`].
    pub ingestion: IngestionOptions,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("ingestion", &self.ingestion)
            .finish()
    }
}

#[derive(Debug)]
struct LoadedDataset {
    source: SourceIdentity,
    original: Table,
    working: Table,
    history: Vec<String>,
}

#[derive(Debug)]
enum SessionState {
    Empty,
    Loaded(LoadedDataset),
}

/// An interactive cleaning session over one dataset at a time.
#[derive(Debug)]
pub struct CleaningSession {
    state: SessionState,
    options: SessionOptions,
}

impl Default for CleaningSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CleaningSession {
    /// Create an empty session with default options.
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            state: SessionState::Empty,
            options,
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Load `table` as the dataset identified by `source`.
    ///
    /// If `source` is already loaded, nothing changes and the table is dropped.
    pub fn load(&mut self, table: Table, source: SourceIdentity) -> LoadOutcome {
        if self.skip_if_loaded(&source) {
            return LoadOutcome::AlreadyLoaded;
        }

        let (rows, columns) = table.shape();
        let event = SessionEvent::Loaded {
            source: source.to_string(),
            rows,
            columns,
        };
        self.state = SessionState::Loaded(LoadedDataset {
            source,
            original: table.clone(),
            working: table,
            history: Vec::new(),
        });
        self.emit(event);
        LoadOutcome::Loaded
    }

    /// Ingest an upload and load it as the dataset identified by `source`.
    ///
    /// Ingestion uses [`SessionOptions::ingestion`]; with `schema` the columns are parsed against
    /// it, otherwise types are inferred. If `source` is already loaded the bytes are not parsed.
    ///
    /// # Errors
    ///
    /// [`CleaningError::Ingestion`] if the bytes cannot be parsed. The session keeps whatever it
    /// held before the call.
    pub fn load_from_bytes(
        &mut self,
        bytes: &[u8],
        source: SourceIdentity,
        schema: Option<&Schema>,
    ) -> CleaningResult<LoadOutcome> {
        if self.skip_if_loaded(&source) {
            return Ok(LoadOutcome::AlreadyLoaded);
        }
        let table = ingest_from_bytes(bytes, source.as_str(), schema, &self.options.ingestion)?;
        Ok(self.load(table, source))
    }

    /// Load the built-in sample dataset (see [`sample_table`]).
    pub fn load_sample(&mut self) -> LoadOutcome {
        let source = SourceIdentity::sample();
        if self.skip_if_loaded(&source) {
            return LoadOutcome::AlreadyLoaded;
        }
        self.load(sample_table(), source)
    }

    /// Apply `operation` to the working table.
    ///
    /// # Errors
    ///
    /// - [`CleaningError::InvalidState`] if nothing is loaded
    /// - whatever the operation returns; the working table is left unchanged
    pub fn apply(&mut self, operation: &CleaningOperation) -> CleaningResult<OperationReport> {
        let label = operation.to_string();
        let loaded = self.loaded_mut("apply an operation")?;

        match apply_operation(&loaded.working, operation) {
            Ok(outcome) => {
                loaded.working = outcome.table;
                loaded.history.push(label.clone());
                let (rows, columns) = loaded.working.shape();
                self.emit(SessionEvent::Applied {
                    operation: label,
                    report: outcome.report.clone(),
                    rows,
                    columns,
                });
                Ok(outcome.report)
            }
            Err(e) => {
                self.emit(SessionEvent::ApplyFailed {
                    operation: label,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Restore the working table from the original and clear the history.
    ///
    /// # Errors
    ///
    /// [`CleaningError::InvalidState`] if nothing is loaded.
    pub fn reset(&mut self) -> CleaningResult<()> {
        let loaded = self.loaded_mut("reset")?;
        loaded.working = loaded.original.clone();
        loaded.history.clear();
        let (rows, columns) = loaded.working.shape();
        self.emit(SessionEvent::Reset { rows, columns });
        Ok(())
    }

    /// Serialize the working table as CSV.
    ///
    /// # Errors
    ///
    /// [`CleaningError::InvalidState`] if nothing is loaded.
    pub fn export(&self) -> CleaningResult<String> {
        let working = self.require_working("export")?;
        let csv = export::to_csv_string(working)?;
        self.emit(SessionEvent::Exported {
            rows: working.row_count(),
            bytes: csv.len(),
        });
        Ok(csv)
    }

    /// Write the working table as CSV to `writer`.
    ///
    /// # Errors
    ///
    /// [`CleaningError::InvalidState`] if nothing is loaded, or the writer's error.
    pub fn export_to_writer<W: Write>(&self, writer: W) -> CleaningResult<()> {
        let working = self.require_working("export")?;
        let mut counting = CountingWriter { inner: writer, bytes: 0 };
        export::write_csv(working, &mut counting)?;
        self.emit(SessionEvent::Exported {
            rows: working.row_count(),
            bytes: counting.bytes,
        });
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded(_))
    }

    pub fn source(&self) -> Option<&SourceIdentity> {
        self.loaded().map(|l| &l.source)
    }

    /// The table as loaded; never modified by operations.
    pub fn original(&self) -> Option<&Table> {
        self.loaded().map(|l| &l.original)
    }

    /// The table with all operations since the last load or reset applied.
    pub fn working(&self) -> Option<&Table> {
        self.loaded().map(|l| &l.working)
    }

    /// Labels of operations applied since the last load or reset, oldest first.
    pub fn history(&self) -> &[String] {
        match self.loaded() {
            Some(l) => &l.history,
            None => &[],
        }
    }

    pub fn original_statistics(&self) -> Option<DatasetStatistics> {
        self.original().map(dataset_statistics)
    }

    pub fn working_statistics(&self) -> Option<DatasetStatistics> {
        self.working().map(dataset_statistics)
    }

    /// Statistics for one column of the working table.
    pub fn column_statistics(&self, column: &str) -> Option<ColumnStatistics> {
        self.working().and_then(|t| column_statistics(t, column))
    }

    fn loaded(&self) -> Option<&LoadedDataset> {
        match &self.state {
            SessionState::Loaded(l) => Some(l),
            SessionState::Empty => None,
        }
    }

    fn loaded_mut(&mut self, action: &str) -> CleaningResult<&mut LoadedDataset> {
        match &mut self.state {
            SessionState::Loaded(l) => Ok(l),
            SessionState::Empty => Err(not_loaded(action)),
        }
    }

    fn require_working(&self, action: &str) -> CleaningResult<&Table> {
        self.working().ok_or_else(|| not_loaded(action))
    }

    fn skip_if_loaded(&self, source: &SourceIdentity) -> bool {
        let loaded = self.source() == Some(source);
        if loaded {
            self.emit(SessionEvent::LoadSkipped {
                source: source.to_string(),
            });
        }
        loaded
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_event(&event);
        }
    }
}

fn not_loaded(action: &str) -> CleaningError {
    CleaningError::InvalidState {
        message: format!("cannot {action}: no dataset loaded"),
    }
}

struct CountingWriter<W> {
    inner: W,
    bytes: usize,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
