// crates/server/src/lib.rs
//! Insight-board server library.
//!
//! This crate provides the Axum-based HTTP server for the insight-board
//! dashboard. It serves a read-only JSON API over an immutable record store
//! loaded once at startup: filtered/paginated listing, group-by aggregation,
//! filter options, and dataset statistics.

pub mod error;
pub mod routes;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use axum::Router;
use insight_board_store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application over the given record store.
///
/// This sets up:
/// - API routes (health, insights)
/// - CORS for the frontend dev server (allows any origin)
/// - Request tracing
pub fn create_app(store: RecordStore) -> Router {
    let state = AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
