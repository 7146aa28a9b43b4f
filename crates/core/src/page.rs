// crates/core/src/page.rs
//! Sort, slice, and count a filtered record set.

use crate::error::{QueryError, QueryResult};
use crate::record::{InsightRecord, SortKey};

/// Default page size when the request does not specify one.
pub const DEFAULT_LIMIT: usize = 50;

/// Validated pagination parameters for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
    pub sort: SortKey,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            sort: SortKey::default(),
        }
    }
}

impl PageSpec {
    /// Parse raw pagination parameters with the strict policy: non-numeric
    /// or non-positive `page`/`limit` and unknown sort fields are rejected
    /// with `InvalidArgument`. Absent or empty values take defaults.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        sort: Option<&str>,
    ) -> QueryResult<Self> {
        let page = parse_positive(page, "page", 1)?;
        let limit = parse_positive(limit, "limit", DEFAULT_LIMIT)?;
        let sort = match sort.filter(|s| !s.is_empty()) {
            Some(raw) => SortKey::parse(raw)?,
            None => SortKey::default(),
        };

        Ok(Self { page, limit, sort })
    }
}

fn parse_positive(raw: Option<&str>, name: &str, default: usize) -> QueryResult<usize> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(text) => match text.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n as usize),
            _ => Err(QueryError::invalid(format!(
                "Invalid {name} '{text}': must be a positive integer"
            ))),
        },
    }
}

/// One page of results plus the totals computed before slicing.
#[derive(Debug)]
pub struct Page<'a> {
    pub records: Vec<&'a InsightRecord>,
    /// Count of the full filtered set, independent of the slice.
    pub total: usize,
    /// `ceil(total / limit)`; 0 when the filtered set is empty.
    pub total_pages: usize,
}

/// Sort the filtered set and slice out the requested page.
///
/// A page past the end of the result set returns an empty slice with the
/// totals intact; it is not an error.
pub fn paginate<'a>(mut filtered: Vec<&'a InsightRecord>, spec: &PageSpec) -> Page<'a> {
    let total = filtered.len();
    let total_pages = total.div_ceil(spec.limit);

    filtered.sort_by(|a, b| spec.sort.compare(a, b));

    // Saturating math: a page number near usize::MAX is valid input under
    // the strict parse policy and must land past the end, not overflow.
    let records = filtered
        .into_iter()
        .skip(spec.page.saturating_sub(1).saturating_mul(spec.limit))
        .take(spec.limit)
        .collect();

    Page {
        records,
        total,
        total_pages,
    }
}
