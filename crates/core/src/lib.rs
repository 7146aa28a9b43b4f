// crates/core/src/lib.rs
//! Insight-board query layer.
//!
//! Pure functions over an immutable slice of [`InsightRecord`]s: building a
//! filter from request parameters, sorting and paginating the filtered set,
//! group-by aggregation for charts, whole-dataset statistics, and the
//! distinct-value lists that drive the filter controls. Nothing in this crate
//! performs I/O or touches global state; the record slice is always passed in.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod options;
pub mod page;
pub mod record;

pub use aggregate::{
    aggregate, aggregate_view, dataset_stats, top_groups, DatasetStats, GroupBucket, TopGroup,
};
pub use error::{QueryError, QueryResult};
pub use filter::{FilterParams, FilterSpec};
pub use options::{filter_options, FilterOptions};
pub use page::{paginate, Page, PageSpec};
pub use record::{GroupField, GroupKey, InsightRecord, SortField, SortKey};

/// Truncation applied to the aggregated chart view.
pub const AGGREGATE_TOP_N: usize = 20;

/// Truncation applied to the top-topics / top-countries lists in stats.
pub const STATS_TOP_N: usize = 5;
