//! Loose-shape coercion for raw API values.
//!
//! The databases disagree about everything: CrossRef wraps titles in
//! arrays and years in `date-parts`, CORE reports language as an object,
//! IEEE nests authors two levels deep, Scopus sends years as cover dates.
//! These helpers accept the shapes the supported APIs actually return and
//! give back canonical values, or `None` when a value cannot be read.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b([12]\d{3})\b").expect("valid year regex"))
}

/// Coerce a raw value to trimmed text.
///
/// Arrays yield their first element (CrossRef `title`/`container-title`);
/// objects yield a `name`, `text`, or `value` member (CORE `language`,
/// DBLP author entries). Empty or whitespace-only text is unknown.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => items.first().and_then(as_text),
        Value::Object(map) => ["name", "text", "value"]
            .iter()
            .find_map(|key| map.get(*key).and_then(as_text)),
        _ => None,
    }
}

/// Coerce a raw value to a publication year.
///
/// Handles plain integers, date strings (`"2020-03-10"`, `"July 2020"`,
/// `"2020"`), CrossRef `{"date-parts": [[2020, 3, 10]]}` objects, and
/// arrays of any of these.
pub fn as_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .and_then(|year| i32::try_from(year).ok())
            .filter(|year| (1000..3000).contains(year)),
        Value::String(text) => year_pattern()
            .captures(text)
            .and_then(|captures| captures[1].parse().ok()),
        Value::Object(map) => map.get("date-parts").and_then(as_year),
        Value::Array(items) => items.first().and_then(as_year),
        _ => None,
    }
}

/// Coerce a raw value to an author name list.
///
/// Accepts a delimited string (`"Doe J, Smith A"`), an array of names, an
/// array of author objects (`name`, `full_name`, `family`, `creator`,
/// `authname`, `text` — the keys the supported APIs use), or an object
/// wrapping one of those under `author`/`authors` (IEEE, DBLP).
pub fn as_authors(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => {
            let separator = if text.contains(';') { ';' } else { ',' };
            text.split(separator)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        }
        Value::Array(items) => items.iter().filter_map(author_name).collect(),
        Value::Object(map) => map
            .get("authors")
            .or_else(|| map.get("author"))
            .map(as_authors)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => {
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        Value::Object(map) => ["name", "full_name", "family", "creator", "authname", "text"]
            .iter()
            .find_map(|key| map.get(*key).and_then(as_text)),
        _ => None,
    }
}
