//! Ingestion entrypoints and implementations.
//!
//! This is the boundary where raw uploads become a [`crate::types::Table`]. Most callers should
//! use [`ingest_from_bytes`] or [`ingest_from_path`] (from [`unified`]) which:
//!
//! - pick the format (explicitly, from the file extension, or CSV for bytes)
//! - either parse against a caller-supplied schema or infer column types
//! - optionally report success/failure/alerts to a [`crate::observability::IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod infer;
pub mod json;
pub mod unified;

pub use infer::MissingMarkers;
pub use unified::{ingest_from_bytes, ingest_from_path, IngestionFormat, IngestionOptions};
