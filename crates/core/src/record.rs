// crates/core/src/record.rs
//! The insight record model and the closed field enums derived from it.
//!
//! The source dataset is sparse: any field can be absent, and absence is
//! modeled as `None` (import normalizes `""`/`"N/A"`/`"NA"` away before a
//! record reaches this crate). Grouping and sorting go through explicit
//! enums with accessor mappings rather than stringly field lookups, so an
//! unsupported field name is rejected at the boundary instead of silently
//! matching nothing.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// One row of the insights dataset. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pestle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    /// Ingestion timestamp; the default sort key (most-recent-first).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

impl InsightRecord {
    /// Start a record with just a title. The `with_*` builders below exist
    /// for fixtures and callers assembling records field by field.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_pestle(mut self, pestle: impl Into<String>) -> Self {
        self.pestle = Some(pestle.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_end_year(mut self, year: i32) -> Self {
        self.end_year = Some(year);
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_likelihood(mut self, likelihood: f64) -> Self {
        self.likelihood = Some(likelihood);
        self
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = Some(relevance);
        self
    }

    pub fn with_added(mut self, added: DateTime<Utc>) -> Self {
        self.added = Some(added);
        self
    }
}

// ============================================================================
// Grouping
// ============================================================================

/// Allow-listed fields a caller may group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Sector,
    Region,
    Country,
    Topic,
    Pestle,
    Source,
    EndYear,
}

/// Wire names accepted by [`GroupField::parse`], in the order they are
/// listed in error messages.
const GROUP_FIELD_NAMES: &[(&str, GroupField)] = &[
    ("sector", GroupField::Sector),
    ("region", GroupField::Region),
    ("country", GroupField::Country),
    ("topic", GroupField::Topic),
    ("pestle", GroupField::Pestle),
    ("source", GroupField::Source),
    ("end_year", GroupField::EndYear),
];

impl GroupField {
    /// Parse a `groupBy` parameter. Anything outside the allow-list is an
    /// `InvalidArgument`.
    pub fn parse(name: &str) -> QueryResult<Self> {
        GROUP_FIELD_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| *f)
            .ok_or_else(|| {
                let valid: Vec<&str> = GROUP_FIELD_NAMES.iter().map(|(n, _)| *n).collect();
                QueryError::invalid(format!(
                    "Invalid groupBy parameter '{}'. Valid options: {}",
                    name,
                    valid.join(", ")
                ))
            })
    }

    /// The grouping key a record contributes under this field.
    pub fn key_of(&self, record: &InsightRecord) -> GroupKey {
        match self {
            GroupField::Sector => GroupKey::from_text(record.sector.as_deref()),
            GroupField::Region => GroupKey::from_text(record.region.as_deref()),
            GroupField::Country => GroupKey::from_text(record.country.as_deref()),
            GroupField::Topic => GroupKey::from_text(record.topic.as_deref()),
            GroupField::Pestle => GroupKey::from_text(record.pestle.as_deref()),
            GroupField::Source => GroupKey::from_text(record.source.as_deref()),
            GroupField::EndYear => match record.end_year {
                Some(year) => GroupKey::Year(year),
                None => GroupKey::Missing,
            },
        }
    }
}

/// A raw grouping value. Records with the field absent land in the
/// `Missing` bucket, which serializes as JSON `null` and is never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Text(String),
    Year(i32),
    Missing,
}

impl GroupKey {
    fn from_text(value: Option<&str>) -> Self {
        match value {
            Some(text) => GroupKey::Text(text.to_string()),
            None => GroupKey::Missing,
        }
    }
}

impl Ord for GroupKey {
    /// Key-ascending order used as the aggregation tiebreak: present keys
    /// first (years before text, though a single grouping never mixes
    /// them), the missing bucket last.
    fn cmp(&self, other: &Self) -> Ordering {
        use GroupKey::*;
        match (self, other) {
            (Text(a), Text(b)) => a.cmp(b),
            (Year(a), Year(b)) => a.cmp(b),
            (Year(_), Text(_)) => Ordering::Less,
            (Text(_), Year(_)) => Ordering::Greater,
            (Missing, Missing) => Ordering::Equal,
            (Missing, _) => Ordering::Greater,
            (_, Missing) => Ordering::Less,
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Fields a list query may sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Added,
    Published,
    EndYear,
    StartYear,
    Intensity,
    Likelihood,
    Relevance,
    Title,
}

const SORT_FIELD_NAMES: &[(&str, SortField)] = &[
    ("added", SortField::Added),
    ("published", SortField::Published),
    ("end_year", SortField::EndYear),
    ("start_year", SortField::StartYear),
    ("intensity", SortField::Intensity),
    ("likelihood", SortField::Likelihood),
    ("relevance", SortField::Relevance),
    ("title", SortField::Title),
];

/// A parsed sort expression: field plus direction. The wire convention is a
/// bare field name for ascending and a `-` prefix for descending, e.g.
/// `-added` (the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortKey {
    fn default() -> Self {
        Self {
            field: SortField::Added,
            descending: true,
        }
    }
}

impl SortKey {
    /// Parse a sort expression. Unknown field names are rejected rather
    /// than silently sorting by nothing.
    pub fn parse(raw: &str) -> QueryResult<Self> {
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let field = SORT_FIELD_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| *f)
            .ok_or_else(|| {
                let valid: Vec<&str> = SORT_FIELD_NAMES.iter().map(|(n, _)| *n).collect();
                QueryError::invalid(format!(
                    "Invalid sort field '{}'. Valid options: {}",
                    name,
                    valid.join(", ")
                ))
            })?;

        Ok(Self { field, descending })
    }

    /// Compare two records under this key. Records missing the sort field
    /// order after all present values regardless of direction, so a
    /// descending sort never floats blanks to the top.
    pub fn compare(&self, a: &InsightRecord, b: &InsightRecord) -> Ordering {
        let ord = match self.field {
            SortField::Added => cmp_present(&a.added, &b.added, Ord::cmp),
            SortField::Published => cmp_present(&a.published, &b.published, Ord::cmp),
            SortField::EndYear => cmp_present(&a.end_year, &b.end_year, Ord::cmp),
            SortField::StartYear => cmp_present(&a.start_year, &b.start_year, Ord::cmp),
            SortField::Intensity => cmp_present(&a.intensity, &b.intensity, f64::total_cmp),
            SortField::Likelihood => cmp_present(&a.likelihood, &b.likelihood, f64::total_cmp),
            SortField::Relevance => cmp_present(&a.relevance, &b.relevance, f64::total_cmp),
            SortField::Title => cmp_present(&a.title, &b.title, Ord::cmp),
        };
        match ord {
            PresentOrdering::Both(o) if self.descending => o.reverse(),
            PresentOrdering::Both(o) => o,
            PresentOrdering::Fixed(o) => o,
        }
    }
}

/// Outcome of comparing two optional sort values: `Both` is reversible by
/// direction, `Fixed` (one side missing) is not.
enum PresentOrdering {
    Both(Ordering),
    Fixed(Ordering),
}

fn cmp_present<T>(
    a: &Option<T>,
    b: &Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> PresentOrdering {
    match (a, b) {
        (Some(x), Some(y)) => PresentOrdering::Both(cmp(x, y)),
        (Some(_), None) => PresentOrdering::Fixed(Ordering::Less),
        (None, Some(_)) => PresentOrdering::Fixed(Ordering::Greater),
        (None, None) => PresentOrdering::Fixed(Ordering::Equal),
    }
}
