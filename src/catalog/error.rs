//! Catalog error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the library catalog.
///
/// Any of these is fatal at startup: the filter cannot run without a catalog,
/// and a partially loaded catalog is never produced.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read the catalog file.
    #[error("Failed to read catalog file {path}: {source}")]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the catalog file.
    #[error("Failed to parse catalog file {path}: {source}")]
    ParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying JSON parse error.
        source: serde_json::Error,
    },
}
