// crates/server/src/routes/mod.rs
//! API route handlers for the insight-board server.

pub mod health;
pub mod insights;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health              - Liveness probe
/// - GET /api/insights            - Filtered, paginated record list
/// - GET /api/insights/aggregated - Group-by aggregation for charts
/// - GET /api/insights/filters    - Distinct filter option values
/// - GET /api/insights/stats      - Whole-dataset statistics
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", insights::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_board_store::RecordStore;

    #[test]
    fn test_api_routes_creation() {
        let state = AppState::new(RecordStore::from_records(Vec::new()));
        let _router = api_routes(state);
    }
}
