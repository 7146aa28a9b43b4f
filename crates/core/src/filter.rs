// crates/core/src/filter.rs
//! Query builder: raw request parameters in, a [`FilterSpec`] predicate out.

use crate::record::InsightRecord;

/// The raw filter parameters of a list request, as received off the wire.
/// Every field is optional; an empty value is treated as absent.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub end_year: Option<String>,
    pub topics: Option<String>,
    pub sector: Option<String>,
    pub region: Option<String>,
    pub pest: Option<String>,
    pub source: Option<String>,
    pub swot: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// A compiled set of constraints over [`InsightRecord`]s. Built once per
/// request, applied conjunctively, never mutated.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Raw `end_year` text; coerced to a number at match time so malformed
    /// input matches nothing instead of erroring at build time.
    end_year: Option<String>,
    /// Topic set membership, from the comma-separated `topics` parameter.
    topics: Option<Vec<String>>,
    sector: Option<String>,
    region: Option<String>,
    pestle: Option<String>,
    source: Option<String>,
    country: Option<String>,
    city: Option<String>,
    /// Lowercased needle for the case-insensitive title-substring filter
    /// (`swot` on the wire, a naming artifact of the source domain).
    title_contains: Option<String>,
}

/// Treat present-but-empty parameters as absent.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(String::from)
}

impl FilterSpec {
    /// Build a spec from request parameters. Pure; unrecognized or empty
    /// inputs simply contribute no constraint.
    pub fn from_params(params: &FilterParams) -> Self {
        // Empty segments from splits like "a,,b" or "a," are discarded so
        // they never match records with an empty-string topic.
        let topics = non_empty(&params.topics).map(|raw| {
            raw.split(',')
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });

        Self {
            end_year: non_empty(&params.end_year),
            topics: topics.filter(|t| !t.is_empty()),
            sector: non_empty(&params.sector),
            region: non_empty(&params.region),
            pestle: non_empty(&params.pest),
            source: non_empty(&params.source),
            country: non_empty(&params.country),
            city: non_empty(&params.city),
            title_contains: non_empty(&params.swot).map(|s| s.to_lowercase()),
        }
    }

    /// True when no constraint is set, i.e. the spec matches every record.
    pub fn is_unconstrained(&self) -> bool {
        self.end_year.is_none()
            && self.topics.is_none()
            && self.sector.is_none()
            && self.region.is_none()
            && self.pestle.is_none()
            && self.source.is_none()
            && self.country.is_none()
            && self.city.is_none()
            && self.title_contains.is_none()
    }

    /// Apply all constraints conjunctively.
    pub fn matches(&self, record: &InsightRecord) -> bool {
        if let Some(raw) = &self.end_year {
            let matched = raw
                .parse::<i32>()
                .ok()
                .is_some_and(|year| record.end_year == Some(year));
            if !matched {
                return false;
            }
        }

        if let Some(topics) = &self.topics {
            let matched = record
                .topic
                .as_deref()
                .is_some_and(|t| topics.iter().any(|wanted| wanted == t));
            if !matched {
                return false;
            }
        }

        if !field_equals(&self.sector, &record.sector) {
            return false;
        }
        if !field_equals(&self.region, &record.region) {
            return false;
        }
        if !field_equals(&self.pestle, &record.pestle) {
            return false;
        }
        if !field_equals(&self.source, &record.source) {
            return false;
        }
        if !field_equals(&self.country, &record.country) {
            return false;
        }
        if !field_equals(&self.city, &record.city) {
            return false;
        }

        if let Some(needle) = &self.title_contains {
            let matched = record
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle));
            if !matched {
                return false;
            }
        }

        true
    }
}

/// Exact-match constraint: unconstrained passes, otherwise the record field
/// must be present and equal.
fn field_equals(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        Some(v) => actual.as_deref() == Some(v.as_str()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InsightRecord {
        InsightRecord::titled("Oil production will decline in Norway")
            .with_topic("oil")
            .with_sector("Energy")
            .with_region("Northern Europe")
            .with_pestle("Industries")
            .with_source("EIA")
            .with_country("Norway")
            .with_city("Oslo")
            .with_end_year(2027)
    }

    fn params(f: impl FnOnce(&mut FilterParams)) -> FilterParams {
        let mut p = FilterParams::default();
        f(&mut p);
        p
    }

    #[test]
    fn test_empty_params_match_everything() {
        let spec = FilterSpec::from_params(&FilterParams::default());
        assert!(spec.is_unconstrained());
        assert!(spec.matches(&record()));
        assert!(spec.matches(&InsightRecord::default()));
    }

    #[test]
    fn test_empty_value_is_absent_constraint() {
        let spec = FilterSpec::from_params(&params(|p| {
            p.sector = Some(String::new());
            p.topics = Some(String::new());
        }));
        assert!(spec.is_unconstrained());
    }

    #[test]
    fn test_exact_match_constraints() {
        let spec = FilterSpec::from_params(&params(|p| {
            p.sector = Some("Energy".into());
            p.country = Some("Norway".into());
        }));
        assert!(spec.matches(&record()));

        let other = record().with_country("Sweden");
        assert!(!spec.matches(&other));
    }

    #[test]
    fn test_exact_match_requires_field_present() {
        let spec = FilterSpec::from_params(&params(|p| p.city = Some("Oslo".into())));
        assert!(spec.matches(&record()));
        assert!(!spec.matches(&InsightRecord::titled("no city")));
    }

    #[test]
    fn test_end_year_coercion() {
        let spec = FilterSpec::from_params(&params(|p| p.end_year = Some("2027".into())));
        assert!(spec.matches(&record()));

        let spec = FilterSpec::from_params(&params(|p| p.end_year = Some("2030".into())));
        assert!(!spec.matches(&record()));
    }

    #[test]
    fn test_malformed_end_year_matches_nothing() {
        let spec = FilterSpec::from_params(&params(|p| p.end_year = Some("soon".into())));
        assert!(!spec.is_unconstrained());
        assert!(!spec.matches(&record()));
    }

    #[test]
    fn test_topics_set_membership() {
        let spec = FilterSpec::from_params(&params(|p| p.topics = Some("gas,oil,coal".into())));
        assert!(spec.matches(&record()));

        let spec = FilterSpec::from_params(&params(|p| p.topics = Some("gas,coal".into())));
        assert!(!spec.matches(&record()));
    }

    #[test]
    fn test_topics_strips_empty_segments() {
        // "oil," and ",,oil" must behave exactly like "oil"
        for raw in ["oil,", ",,oil", "oil"] {
            let spec = FilterSpec::from_params(&params(|p| p.topics = Some(raw.into())));
            assert!(spec.matches(&record()), "raw: {raw:?}");

            let mut empty_topic = record();
            empty_topic.topic = None;
            assert!(!spec.matches(&empty_topic), "raw: {raw:?}");
        }
    }

    #[test]
    fn test_all_empty_segments_is_no_constraint() {
        let spec = FilterSpec::from_params(&params(|p| p.topics = Some(",,".into())));
        assert!(spec.is_unconstrained());
    }

    #[test]
    fn test_swot_is_case_insensitive_title_substring() {
        let spec = FilterSpec::from_params(&params(|p| p.swot = Some("NORWAY".into())));
        assert!(spec.matches(&record()));

        let spec = FilterSpec::from_params(&params(|p| p.swot = Some("denmark".into())));
        assert!(!spec.matches(&record()));
    }

    #[test]
    fn test_swot_requires_title_present() {
        let spec = FilterSpec::from_params(&params(|p| p.swot = Some("oil".into())));
        let mut untitled = record();
        untitled.title = None;
        assert!(!spec.matches(&untitled));
    }

    #[test]
    fn test_constraints_are_conjunctive() {
        let spec = FilterSpec::from_params(&params(|p| {
            p.sector = Some("Energy".into());
            p.topics = Some("gas".into());
        }));
        // sector matches but topic does not
        assert!(!spec.matches(&record()));
    }
}
