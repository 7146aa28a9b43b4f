// crates/store/src/loader.rs
//! Dataset import: parse the raw JSON export and clean each row.
//!
//! The source export is messy: keys may carry stray whitespace or mixed
//! case, absent values appear as `""`, `"N/A"`, or `"NA"`, numeric scores
//! are sometimes strings, and the ingestion timestamps use a custom
//! `"January, 20 2017 03:51:25"` format. All of that is normalized here so
//! the query layer only ever sees clean `Option` fields.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use insight_board_core::InsightRecord;
use serde_json::Value;

use crate::{StoreError, StoreResult};

/// Timestamp format used by the dataset's `added`/`published` columns.
const DATASET_TIME_FORMAT: &str = "%B, %d %Y %H:%M:%S";

/// Read and clean every record in the dataset file. Rows that are not JSON
/// objects are skipped with a warning rather than failing the import.
pub fn load_records(path: &Path) -> StoreResult<Vec<InsightRecord>> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let rows: Vec<Value> =
        serde_json::from_str(&text).map_err(|e| StoreError::MalformedJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        match record_from_value(row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "Skipped non-object rows during import");
    }

    Ok(records)
}

/// Convert one raw JSON row into a cleaned record. Returns `None` when the
/// row is not an object.
pub fn record_from_value(row: Value) -> Option<InsightRecord> {
    let map = match row {
        Value::Object(map) => map,
        _ => return None,
    };

    // Normalize keys ("End Year" -> "end_year") and blank-ish values first.
    let mut record = InsightRecord::default();
    for (raw_key, raw_value) in map {
        let key = raw_key.trim().to_lowercase().replace(' ', "_");
        let value = clean_value(raw_value);
        match key.as_str() {
            "title" => record.title = as_text(&value),
            "insight" => record.insight = as_text(&value),
            "url" => record.url = as_text(&value),
            "topic" => record.topic = as_text(&value),
            "sector" => record.sector = as_text(&value),
            "region" => record.region = as_text(&value),
            "pestle" => record.pestle = as_text(&value),
            "source" => record.source = as_text(&value),
            "country" => record.country = as_text(&value),
            "city" => record.city = as_text(&value),
            "start_year" => record.start_year = as_year(&value),
            "end_year" => record.end_year = as_year(&value),
            "intensity" => record.intensity = as_number(&value),
            "likelihood" => record.likelihood = as_number(&value),
            "relevance" => record.relevance = as_number(&value),
            "impact" => record.impact = as_number(&value),
            "added" => record.added = as_timestamp(&value),
            "published" => record.published = as_timestamp(&value),
            _ => {}
        }
    }
    Some(record)
}

/// Map the dataset's explicit "no value" spellings to JSON null.
fn clean_value(value: Value) -> Value {
    match value {
        Value::String(s) if s.is_empty() || s == "N/A" || s == "NA" => Value::Null,
        other => other,
    }
}

fn as_text(value: &Value) -> Option<String> {
    value.as_str().map(String::from)
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

/// Parse the dataset timestamp format, falling back to RFC 3339.
fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, DATASET_TIME_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
