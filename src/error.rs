use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for session and cleaning operations.
pub type CleaningResult<T> = Result<T, CleaningError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV and JSON ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not conform to the provided schema (missing required fields/columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by cleaning operations and [`crate::session::CleaningSession`].
///
/// Whenever one of these is returned, the session's working table is exactly what it was
/// before the call.
#[derive(Debug, Error)]
pub enum CleaningError {
    /// A user-supplied fill literal is malformed.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A statistic is undefined for the column (e.g. the mean of no values).
    #[error("cannot compute {statistic} for column '{column}': {message}")]
    Computation {
        column: String,
        statistic: &'static str,
        message: String,
    },

    /// The session is not in a state that allows the call (e.g. reset with nothing loaded).
    #[error("invalid state: {message}")]
    InvalidState { message: String },

    /// Loading the source data failed.
    #[error("ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    /// Writing the exported table failed.
    #[error("export error: {0}")]
    Export(#[from] csv::Error),

    /// Underlying I/O error while exporting.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
