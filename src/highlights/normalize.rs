// src/highlights/normalize.rs
//! Converts heterogeneous feed payloads into uniform `Record`s.
//!
//! Every field lookup is a fallback chain; bad data degrades to a
//! default value instead of failing the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::highlights::types::Record;

type Entry<'a> = (Option<&'a str>, &'a Map<String, Value>);

/// Flatten a payload into raw entries, each paired with the mapping key
/// it was found under (used as a title fallback). Supported shapes:
/// an array of objects, a map of objects, and a map of arrays of
/// objects. Anything else yields no entries.
fn payload_entries(payload: &Value) -> Vec<Entry<'_>> {
    match payload {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|m| (None, m))
            .collect(),
        Value::Object(map) => {
            let mut out = Vec::new();
            for (key, v) in map {
                match v {
                    Value::Object(m) => out.push((Some(key.as_str()), m)),
                    Value::Array(items) => out.extend(
                        items
                            .iter()
                            .filter_map(Value::as_object)
                            .map(|m| (Some(key.as_str()), m)),
                    ),
                    _ => {}
                }
            }
            out
        }
        _ => Vec::new(),
    }
}

/// Non-empty string field, or None.
fn str_field<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Coerce a popularity field to a non-negative integer. Accepts plain
/// numbers and digit strings; anything else is zero.
fn count_field(entry: &Map<String, Value>, key: &str) -> u64 {
    match entry.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// First element of a list field, preferring `primary` then `fallback`
/// as the URL key inside it.
fn first_list_url(
    entry: &Map<String, Value>,
    list_key: &str,
    primary: &str,
    fallback: &str,
) -> Option<String> {
    let first = entry.get(list_key)?.as_array()?.first()?.as_object()?;
    str_field(first, primary)
        .or_else(|| str_field(first, fallback))
        .map(str::to_string)
}

/// Parse an upstream publication string to UTC, falling back to the
/// epoch so every record carries a comparable timestamp. The upstream
/// emits RFC 3339 or `YYYY-MM-DD HH:MM:SS` style strings.
pub fn parse_published(raw: &str) -> DateTime<Utc> {
    let s = raw.trim();
    if s.is_empty() {
        return DateTime::UNIX_EPOCH;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return dt.with_timezone(&Utc);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return naive.and_utc();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return naive.and_utc();
        }
    }
    DateTime::UNIX_EPOCH
}

/// Build one `Record` from one raw entry. `title_key` is the mapping
/// key the entry was found under, if any.
fn record_from_entry(entry: &Map<String, Value>, category: &str, title_key: Option<&str>) -> Record {
    let title = str_field(entry, "suggested_headline")
        .or_else(|| str_field(entry, "title"))
        .or(title_key.filter(|k| !k.is_empty()))
        .unwrap_or("Untitled")
        .to_string();

    // Keep only the text before the first `|`; the remainder is
    // alternate-language or auxiliary text.
    let summary_full = str_field(entry, "group_summary").unwrap_or("").trim();
    let summary = match summary_full.split_once('|') {
        Some((head, _)) => head.trim().to_string(),
        None => summary_full.to_string(),
    };

    let published_at = str_field(entry, "earliest_published")
        .unwrap_or("")
        .to_string();
    let published_at_parsed = parse_published(&published_at);

    Record {
        category: category.to_string(),
        title,
        summary,
        published_at,
        published_at_parsed,
        heat: count_field(entry, "feed_num"),
        mention_count: count_field(entry, "article_num"),
        image_url: first_list_url(entry, "images", "image_link", "url").unwrap_or_default(),
        link_url: first_list_url(entry, "articles", "link", "url")
            .unwrap_or_else(|| "#".to_string()),
    }
}

/// Normalize one raw feed payload into records tagged with `category`.
/// Pure; never fails. Unsupported shapes yield an empty vec.
pub fn normalize_payload(payload: &Value, category: &str) -> Vec<Record> {
    payload_entries(payload)
        .into_iter()
        .map(|(key, entry)| record_from_entry(entry, category, key))
        .collect()
}
