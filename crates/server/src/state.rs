// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use insight_board_store::RecordStore;

/// Shared application state accessible from all route handlers.
///
/// The record store is written once before the server starts and only read
/// afterwards, so it needs no locking — handlers see it through the `Arc`.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// The immutable record store, injected at construction.
    pub store: RecordStore,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(store: RecordStore) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            store,
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
