//! Catalog storage and loading.
//!
//! The catalog is built once from a JSON file and is immutable afterwards.
//! Loading is all-or-nothing: an unreadable file or a malformed record aborts
//! the whole load, so the filter never runs against a partial catalog.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::error::CatalogError;

/// One tracked script asset and its known identity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Asset filename, matched against the last path segment of request URIs.
    pub name: String,

    /// Canonical location of the minified variant.
    #[serde(rename = "minURI")]
    pub min_uri: String,

    /// Expected SHA-256 digest (lowercase hex) of the minified variant.
    #[serde(rename = "minSha256Digest")]
    pub min_sha256_digest: String,

    /// Canonical location of the un-minified variant.
    #[serde(rename = "maxURI")]
    pub max_uri: String,

    /// Expected SHA-256 digest of the un-minified variant, if pinned.
    #[serde(rename = "maxSha256Digest", default)]
    pub max_sha256_digest: Option<String>,
}

/// Wire format of the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    libraries: Vec<LibraryEntry>,
}

/// Read-only lookup table from asset filename to [`LibraryEntry`].
///
/// Built once at process start; request processing only reads it, so it is
/// shared between connection tasks as a plain `Arc<Catalog>` without locking.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, LibraryEntry>,
}

impl Catalog {
    /// Build a catalog from a list of entries.
    ///
    /// Duplicate names follow last-writer-wins: a later record silently
    /// replaces an earlier one, with a warning logged.
    pub fn from_entries(entries: Vec<LibraryEntry>) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            if let Some(previous) = map.insert(entry.name.clone(), entry) {
                warn!(
                    filename = %previous.name,
                    "Duplicate catalog entry; keeping the later record"
                );
            }
        }
        Self { entries: map }
    }

    /// Load the catalog from a JSON file.
    ///
    /// Fails on any I/O or parse error without producing a partial catalog.
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: CatalogFile =
            serde_json::from_str(&contents).map_err(|e| CatalogError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        let catalog = Self::from_entries(file.libraries);
        debug!(path = %path.display(), entries = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Look up an entry by exact filename.
    ///
    /// Case-sensitive, no prefix or partial matching. This is the hot path
    /// for every proxied response, almost always returning `None`.
    pub fn lookup(&self, filename: &str) -> Option<&LibraryEntry> {
        self.entries.get(filename)
    }

    /// Number of tracked assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over tracked filenames (for the `validate` subcommand).
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
