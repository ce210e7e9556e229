//! `rust-data-cleaning` is a small library for interactively cleaning a tabular dataset: load it,
//! inspect missing values and duplicates, apply cleaning operations one at a time, reset, and
//! export the result.
//!
//! The primary entrypoint is [`session::CleaningSession`], which keeps an untouched original
//! table next to a working table that each [`cleaning::CleaningOperation`] replaces.
//!
//! ## Data model
//!
//! A [`types::Table`] is a [`types::Schema`] plus row-major [`types::Value`] cells. Missing cells
//! are [`types::Value::Null`]. Each column's [`types::DataType`] maps to a
//! [`types::ColumnKind`]:
//!
//! - [`types::DataType::Int64`], [`types::DataType::Float64`]: numeric
//! - [`types::DataType::Utf8`]: text
//! - [`types::DataType::Bool`]: other (never targeted by fills or formatting)
//!
//! ## Quick example: clean the sample dataset
//!
//! ```rust
//! use rust_data_cleaning::cleaning::{CleaningOperation, NumericFill, TextFill, TextFormat};
//! use rust_data_cleaning::session::CleaningSession;
//!
//! # fn main() -> Result<(), rust_data_cleaning::CleaningError> {
//! let mut session = CleaningSession::new();
//! session.load_sample();
//!
//! let before = session.working_statistics().unwrap();
//! assert_eq!(before.numeric_missing, 2);
//! assert_eq!(before.duplicate_rows, 1);
//!
//! session.apply(&CleaningOperation::FillText(TextFill::Mode))?;
//! session.apply(&CleaningOperation::FillNumeric(NumericFill::Mean))?;
//! session.apply(&CleaningOperation::Format(TextFormat::TitleCase))?;
//! session.apply(&CleaningOperation::DropDuplicateRows)?;
//!
//! let csv = session.export()?;
//! assert!(csv.starts_with("Name,Age,City,Salary,Department\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Loading your own data
//!
//! ```no_run
//! use rust_data_cleaning::ingestion::{ingest_from_path, IngestionOptions};
//! use rust_data_cleaning::session::{CleaningSession, SourceIdentity};
//!
//! # fn main() -> Result<(), rust_data_cleaning::IngestionError> {
//! // Column types are inferred when no schema is given.
//! let table = ingest_from_path("people.csv", None, &IngestionOptions::default())?;
//!
//! let mut session = CleaningSession::new();
//! session.load(table, SourceIdentity::from_path("people.csv"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`session`]: the original/working pair and its transitions
//! - [`cleaning`]: fills, text formatting, and row/column pruning
//! - [`statistics`]: missing counts, duplicate counts, descriptive summaries
//! - [`classify`]: numeric vs text column discovery
//! - [`ingestion`]: CSV/JSON loading with schema or type inference
//! - [`export`]: CSV and JSON serialization of a table
//! - [`observability`]: observer hooks for ingestion and session events
//! - [`types`]: schema and in-memory table types
//! - [`error`]: error types

pub mod classify;
pub mod cleaning;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod session;
pub mod statistics;
pub mod types;

pub use error::{CleaningError, CleaningResult, IngestionError, IngestionResult};
