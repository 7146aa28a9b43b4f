// crates/core/src/options.rs
//! Distinct-value lists backing the frontend's filter controls.
//!
//! These always reflect the entire store, not the subset matching the
//! current filter selection: a control keeps showing every possible value
//! even while other filters are active.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::record::InsightRecord;

/// Sorted, deduplicated, non-empty values per categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub sectors: Vec<String>,
    pub regions: Vec<String>,
    pub countries: Vec<String>,
    pub topics: Vec<String>,
    pub pestles: Vec<String>,
    pub sources: Vec<String>,
    pub years: Vec<i32>,
}

fn distinct<'a>(
    records: &'a [InsightRecord],
    get: impl Fn(&'a InsightRecord) -> Option<&'a str>,
) -> Vec<String> {
    records
        .iter()
        .filter_map(get)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Collect the filter options across the whole (unfiltered) store.
pub fn filter_options(records: &[InsightRecord]) -> FilterOptions {
    let years: Vec<i32> = records
        .iter()
        .filter_map(|r| r.end_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    FilterOptions {
        sectors: distinct(records, |r| r.sector.as_deref()),
        regions: distinct(records, |r| r.region.as_deref()),
        countries: distinct(records, |r| r.country.as_deref()),
        topics: distinct(records, |r| r.topic.as_deref()),
        pestles: distinct(records, |r| r.pestle.as_deref()),
        sources: distinct(records, |r| r.source.as_deref()),
        years,
    }
}
