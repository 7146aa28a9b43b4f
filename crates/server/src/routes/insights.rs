// crates/server/src/routes/insights.rs
//! Insights query endpoints.
//!
//! - GET /insights            — Filtered, sorted, paginated record list
//! - GET /insights/aggregated — Group-by aggregation for charts
//! - GET /insights/filters    — Distinct filter option values
//! - GET /insights/stats      — Whole-dataset statistics

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use insight_board_core::{
    aggregate_view, dataset_stats, filter_options, paginate, DatasetStats, FilterOptions,
    FilterParams, FilterSpec, GroupBucket, GroupField, InsightRecord, PageSpec,
};

use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Query parameters for GET /insights. Everything is optional text; the
/// query layer decides what counts as a constraint and validates
/// pagination with the strict policy (400 on non-numeric page/limit).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub end_year: Option<String>,
    pub topics: Option<String>,
    pub sector: Option<String>,
    pub region: Option<String>,
    pub pest: Option<String>,
    pub source: Option<String>,
    pub swot: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    fn filter_params(&self) -> FilterParams {
        FilterParams {
            end_year: self.end_year.clone(),
            topics: self.topics.clone(),
            sector: self.sector.clone(),
            region: self.region.clone(),
            pest: self.pest.clone(),
            source: self.source.clone(),
            swot: self.swot.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
        }
    }
}

/// Response for GET /insights.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub insights: Vec<InsightRecord>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total: usize,
}

/// Query parameters for GET /insights/aggregated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AggregatedQuery {
    #[serde(rename = "groupBy")]
    pub group_by: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/insights — Filtered, paginated record list.
///
/// Filters: end_year, topics (comma-separated set), sector, region, pest,
/// source, swot (title substring), country, city. Pagination: page (1-based,
/// default 1), limit (default 50), sort (`-` prefix = descending, default
/// `-added`). A page past the end returns an empty list with correct totals.
pub async fn list_insights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let spec = PageSpec::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        query.sort.as_deref(),
    )?;
    let filter = FilterSpec::from_params(&query.filter_params());

    let matched: Vec<&InsightRecord> = state
        .store
        .records()
        .iter()
        .filter(|r| filter.matches(r))
        .collect();

    let page = paginate(matched, &spec);

    Ok(Json(ListResponse {
        insights: page.records.into_iter().cloned().collect(),
        total_pages: page.total_pages,
        current_page: spec.page,
        total: page.total,
    }))
}

/// GET /api/insights/aggregated?groupBy=sector — Top-20 groups with count
/// and metric averages, for the chart views. 400 for a `groupBy` outside
/// the allow-list.
pub async fn aggregated_insights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AggregatedQuery>,
) -> ApiResult<Json<Vec<GroupBucket>>> {
    let field = GroupField::parse(query.group_by.as_deref().unwrap_or(""))?;
    Ok(Json(aggregate_view(state.store.records(), field)))
}

/// GET /api/insights/filters — Distinct non-empty values per categorical
/// field across the entire store. Deliberately ignores any active filter
/// selection: the controls always show the full dataset's values.
pub async fn insight_filter_options(
    State(state): State<Arc<AppState>>,
) -> Json<FilterOptions> {
    Json(filter_options(state.store.records()))
}

/// GET /api/insights/stats — Whole-dataset statistics bundle.
pub async fn insight_stats(State(state): State<Arc<AppState>>) -> Json<DatasetStats> {
    Json(dataset_stats(state.store.records()))
}

// ============================================================================
// Router
// ============================================================================

/// Build the insights sub-router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insights", get(list_insights))
        .route("/insights/aggregated", get(aggregated_insights))
        .route("/insights/filters", get(insight_filter_options))
        .route("/insights/stats", get(insight_stats))
}

// ============================================================================
// Tests
// ============================================================================
