//! # Movie Record Store Module
//!
//! The in-memory record store backing the query endpoint. Records are loaded
//! once from a JSON file during startup and never mutated afterwards; the
//! store's lifetime equals the process lifetime.
//!
//! ## Concurrency
//!
//! Because the store is read-only after initialization, it is shared across
//! request tasks behind a plain `Arc` with no locking. Each request filters
//! the full record list independently.

pub mod filter;

// Re-export commonly used types
pub use filter::MovieQuery;

use crate::error::{MovieWebError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

/// A single movie record
///
/// Only the three fields the query pipeline inspects are typed; every other
/// descriptive field in the data file (title, year, duration, director, ...)
/// is captured in the flattened map and passed through to responses
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Genre label, matched case-insensitively as a substring
    pub genre: String,
    /// Production country, matched case-insensitively as a substring
    pub country: String,
    /// Average vote, expected in the domain [1.0, 9.9]
    pub avg_vote: f64,
    /// Remaining descriptive fields, passed through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Immutable, process-wide collection of movie records
///
/// Constructed once at startup from the configured data file and injected
/// into the request handler behind an `Arc`. There is no reload path; a
/// changed data file requires a restart.
#[derive(Debug)]
pub struct MovieStore {
    /// Records in data-file order; query results preserve this order
    movies: Vec<Movie>,
}

impl MovieStore {
    /// Load the store from a JSON data file
    ///
    /// The file must contain a JSON array of movie objects. Records are kept
    /// in file order, which is also the order query responses preserve.
    ///
    /// ## Errors
    /// - `MovieWebError::StoreError`: if the file cannot be read or decoded
    #[instrument(level = "info", name = "store_load", skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            MovieWebError::store_error(
                format!("Failed to read movie data file {}: {e}", path.display()),
                Some(Box::new(e)),
            )
        })?;

        let store = Self::from_json(&bytes).map_err(|e| {
            MovieWebError::store_error(
                format!(
                    "Failed to decode movie data file {}: {}",
                    path.display(),
                    e.internal_message()
                ),
                None,
            )
        })?;

        info!(
            "Loaded {} movie records from {}",
            store.len(),
            path.display()
        );

        Ok(store)
    }

    /// Build the store from raw JSON bytes
    ///
    /// Split out from [`MovieStore::load`] so tests and benches can build a
    /// store without touching the filesystem.
    ///
    /// ## Errors
    /// - `MovieWebError::StoreError`: if the bytes are not a JSON array of
    ///   movie objects
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let movies: Vec<Movie> = serde_json::from_slice(bytes)?;
        Ok(Self { movies })
    }

    /// All records, in data-file order
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Number of records in the store
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Run a query against the full record list
    ///
    /// Pure function of the store plus the query; no state is shared between
    /// requests. See [`MovieQuery::apply`] for the filter pipeline contract.
    ///
    /// ## Errors
    /// - `MovieWebError::ValidationError`: malformed parameter or an empty
    ///   genre/country result
    pub fn query(&self, query: &MovieQuery) -> Result<Vec<&Movie>> {
        query.apply(&self.movies)
    }
}
