// crates/core/src/aggregate.rs
//! Group-by aggregation and whole-dataset statistics.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::{GroupField, GroupKey, InsightRecord};
use crate::{AGGREGATE_TOP_N, STATS_TOP_N};

/// One group in an aggregation result. `_id` carries the raw grouping
/// value, including `null` for the missing-value bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBucket {
    #[serde(rename = "_id")]
    pub key: GroupKey,
    pub count: usize,
    pub avg_intensity: Option<f64>,
    pub avg_likelihood: Option<f64>,
    pub avg_relevance: Option<f64>,
}

/// A group reduced to its key and count, for the top-N lists in stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopGroup {
    #[serde(rename = "_id")]
    pub key: GroupKey,
    pub count: usize,
}

/// Running sums for one group. Records missing a metric are excluded from
/// that metric's mean but still counted in `count`.
#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    intensity: MetricSum,
    likelihood: MetricSum,
    relevance: MetricSum,
}

#[derive(Debug, Default)]
struct MetricSum {
    sum: f64,
    present: usize,
}

impl MetricSum {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.present += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.present > 0).then(|| self.sum / self.present as f64)
    }
}

/// Group `records` by `field` and compute per-group count and metric means,
/// ordered by count descending with ties broken by key ascending (missing
/// bucket last), truncated to `top_n` groups.
pub fn aggregate(records: &[InsightRecord], field: GroupField, top_n: usize) -> Vec<GroupBucket> {
    let mut groups: HashMap<GroupKey, Accumulator> = HashMap::new();

    for record in records {
        let acc = groups.entry(field.key_of(record)).or_default();
        acc.count += 1;
        acc.intensity.add(record.intensity);
        acc.likelihood.add(record.likelihood);
        acc.relevance.add(record.relevance);
    }

    let mut buckets: Vec<GroupBucket> = groups
        .into_iter()
        .map(|(key, acc)| GroupBucket {
            key,
            count: acc.count,
            avg_intensity: acc.intensity.mean(),
            avg_likelihood: acc.likelihood.mean(),
            avg_relevance: acc.relevance.mean(),
        })
        .collect();

    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets.truncate(top_n);
    buckets
}

/// Top-N groups by count only, used for the stats view's topic and country
/// lists. Same grouping and ordering rule as [`aggregate`].
pub fn top_groups(records: &[InsightRecord], field: GroupField, top_n: usize) -> Vec<TopGroup> {
    aggregate(records, field, top_n)
        .into_iter()
        .map(|b| TopGroup {
            key: b.key,
            count: b.count,
        })
        .collect()
}

/// The whole-store statistics bundle behind `GET /api/insights/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub total_records: usize,
    pub avg_intensity: Option<f64>,
    pub avg_likelihood: Option<f64>,
    pub avg_relevance: Option<f64>,
    pub max_intensity: Option<f64>,
    pub min_intensity: Option<f64>,
    pub top_topics: Vec<TopGroup>,
    pub top_countries: Vec<TopGroup>,
}

/// Compute global counts, metric means, and intensity extremes over the
/// entire store, plus the top-5 topics and countries.
pub fn dataset_stats(records: &[InsightRecord]) -> DatasetStats {
    let mut intensity = MetricSum::default();
    let mut likelihood = MetricSum::default();
    let mut relevance = MetricSum::default();
    let mut max_intensity: Option<f64> = None;
    let mut min_intensity: Option<f64> = None;

    for record in records {
        intensity.add(record.intensity);
        likelihood.add(record.likelihood);
        relevance.add(record.relevance);
        if let Some(v) = record.intensity {
            max_intensity = Some(max_intensity.map_or(v, |m| m.max(v)));
            min_intensity = Some(min_intensity.map_or(v, |m| m.min(v)));
        }
    }

    DatasetStats {
        total_records: records.len(),
        avg_intensity: intensity.mean(),
        avg_likelihood: likelihood.mean(),
        avg_relevance: relevance.mean(),
        max_intensity,
        min_intensity,
        top_topics: top_groups(records, GroupField::Topic, STATS_TOP_N),
        top_countries: top_groups(records, GroupField::Country, STATS_TOP_N),
    }
}

/// The general aggregated view: top 20 groups.
pub fn aggregate_view(records: &[InsightRecord], field: GroupField) -> Vec<GroupBucket> {
    aggregate(records, field, AGGREGATE_TOP_N)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sector(name: &str, intensity: Option<f64>) -> InsightRecord {
        let mut r = InsightRecord::titled(name).with_sector(name);
        r.intensity = intensity;
        r
    }

    #[test]
    fn test_worked_sector_example() {
        // two Energy rows with intensities 5 and 7, one Retail row with none
        let records = vec![
            sector("Energy", Some(5.0)),
            sector("Energy", Some(7.0)),
            sector("Retail", None),
        ];

        let buckets = aggregate(&records, GroupField::Sector, AGGREGATE_TOP_N);
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].key, GroupKey::Text("Energy".into()));
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].avg_intensity, Some(6.0));

        assert_eq!(buckets[1].key, GroupKey::Text("Retail".into()));
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[1].avg_intensity, None);
    }

    #[test]
    fn test_counts_sum_to_input_size() {
        let records: Vec<InsightRecord> = (0..37usize)
            .map(|i| {
                if i % 5 == 0 {
                    InsightRecord::titled("no sector")
                } else {
                    sector(["Energy", "Retail", "Aerospace"][i % 3], Some(i as f64))
                }
            })
            .collect();

        let buckets = aggregate(&records, GroupField::Sector, AGGREGATE_TOP_N);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_missing_bucket_is_preserved() {
        let records = vec![sector("Energy", None), InsightRecord::titled("none")];
        let buckets = aggregate(&records, GroupField::Sector, AGGREGATE_TOP_N);
        assert!(buckets.iter().any(|b| b.key == GroupKey::Missing));
    }

    #[test]
    fn test_metric_absence_excluded_from_mean_but_counted() {
        let records = vec![
            sector("Energy", Some(4.0)),
            sector("Energy", None),
            sector("Energy", None),
        ];
        let buckets = aggregate(&records, GroupField::Sector, AGGREGATE_TOP_N);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].avg_intensity, Some(4.0));
    }

    #[test]
    fn test_ordering_count_desc_then_key_asc() {
        let records = vec![
            sector("Retail", None),
            sector("Energy", None),
            sector("Aerospace", None),
            sector("Aerospace", None),
        ];
        let buckets = aggregate(&records, GroupField::Sector, AGGREGATE_TOP_N);
        let keys: Vec<&GroupKey> = buckets.iter().map(|b| &b.key).collect();
        assert_eq!(
            keys,
            vec![
                &GroupKey::Text("Aerospace".into()),
                &GroupKey::Text("Energy".into()),
                &GroupKey::Text("Retail".into()),
            ]
        );
    }

    #[test]
    fn test_missing_bucket_sorts_last_among_ties() {
        let records = vec![sector("Energy", None), InsightRecord::titled("none")];
        let buckets = aggregate(&records, GroupField::Sector, AGGREGATE_TOP_N);
        assert_eq!(buckets[0].key, GroupKey::Text("Energy".into()));
        assert_eq!(buckets[1].key, GroupKey::Missing);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let records: Vec<InsightRecord> = (0..30)
            .map(|i| sector(&format!("sector-{i:02}"), None))
            .collect();
        let buckets = aggregate(&records, GroupField::Sector, AGGREGATE_TOP_N);
        assert_eq!(buckets.len(), 20);
    }

    #[test]
    fn test_end_year_grouping_has_numeric_keys() {
        let records = vec![
            InsightRecord::titled("a").with_end_year(2027),
            InsightRecord::titled("b").with_end_year(2027),
            InsightRecord::titled("c"),
        ];
        let buckets = aggregate(&records, GroupField::EndYear, AGGREGATE_TOP_N);
        assert_eq!(buckets[0].key, GroupKey::Year(2027));
        assert_eq!(buckets[0].count, 2);
    }

    #[test]
    fn test_bucket_serializes_with_mongo_style_id() {
        let bucket = GroupBucket {
            key: GroupKey::Text("Energy".into()),
            count: 2,
            avg_intensity: Some(6.0),
            avg_likelihood: None,
            avg_relevance: None,
        };
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["_id"], "Energy");
        assert_eq!(json["count"], 2);
        assert_eq!(json["avgIntensity"], 6.0);
        assert!(json["avgLikelihood"].is_null());
    }

    #[test]
    fn test_dataset_stats() {
        let records = vec![
            InsightRecord::titled("a")
                .with_topic("oil")
                .with_country("Norway")
                .with_intensity(2.0)
                .with_likelihood(3.0),
            InsightRecord::titled("b")
                .with_topic("oil")
                .with_country("India")
                .with_intensity(8.0),
            InsightRecord::titled("c").with_topic("gas"),
        ];

        let stats = dataset_stats(&records);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.avg_intensity, Some(5.0));
        assert_eq!(stats.avg_likelihood, Some(3.0));
        assert_eq!(stats.avg_relevance, None);
        assert_eq!(stats.max_intensity, Some(8.0));
        assert_eq!(stats.min_intensity, Some(2.0));

        assert_eq!(stats.top_topics[0].key, GroupKey::Text("oil".into()));
        assert_eq!(stats.top_topics[0].count, 2);
        assert_eq!(stats.top_countries.len(), 3); // includes missing bucket
    }

    #[test]
    fn test_stats_top_lists_truncate_to_five() {
        let records: Vec<InsightRecord> = (0..8)
            .map(|i| InsightRecord::titled("x").with_topic(format!("topic-{i}")))
            .collect();
        let stats = dataset_stats(&records);
        assert_eq!(stats.top_topics.len(), 5);
    }

    #[test]
    fn test_stats_on_empty_store() {
        let stats = dataset_stats(&[]);
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.avg_intensity, None);
        assert_eq!(stats.max_intensity, None);
        assert!(stats.top_topics.is_empty());
    }
}
