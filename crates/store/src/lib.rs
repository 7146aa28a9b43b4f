// crates/store/src/lib.rs
//! The record store: a one-time JSON import into an immutable in-memory
//! collection of [`InsightRecord`]s.
//!
//! The store is populated before the server starts accepting requests and
//! never mutated afterwards, so handlers share it behind a plain `Arc`
//! with no locking.

mod loader;

pub use loader::record_from_value;

use std::path::{Path, PathBuf};

use insight_board_core::InsightRecord;
use thiserror::Error;

/// Errors that can occur while importing the dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Dataset file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset JSON in {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Immutable collection of insight records.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<InsightRecord>,
}

impl RecordStore {
    /// Load and clean the bundled JSON dataset. Runs once at startup; a
    /// failure here is fatal to the process, which is how "store
    /// unavailable" surfaces in this system.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let records = loader::load_records(path)?;
        tracing::info!(
            path = %path.display(),
            record_count = records.len(),
            "Dataset imported"
        );
        Ok(Self { records })
    }

    /// Build a store directly from records. Used by tests and by callers
    /// that source data elsewhere.
    pub fn from_records(records: Vec<InsightRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[InsightRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_roundtrip() {
        let store = RecordStore::from_records(vec![
            InsightRecord::titled("a"),
            InsightRecord::titled("b"),
        ]);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.records()[0].title.as_deref(), Some("a"));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = RecordStore::load(Path::new("/nonexistent/insights.json")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
