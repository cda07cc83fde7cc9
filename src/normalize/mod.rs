//! Record normalization: raw database records into canonical publications.
//!
//! Raw records are the item objects each API returns, untouched by the
//! source clients. Normalization consults the per-database field tables in
//! [`fields`], coerces whatever shape the attribute arrives in
//! ([`coerce`]), and leaves unsupported or unreadable attributes unknown.
//! The only error is a record that is not an object at all; such records
//! are skipped individually by the pipeline, never failing a batch.

pub mod coerce;
pub mod fields;

pub use fields::{raw_attribute, CanonicalField};

use serde_json::Value;
use thiserror::Error;

use crate::models::{Publication, SourceId};

/// A raw record that could not be normalized at all.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{database} record is not a JSON object: {found}")]
    NotARecord {
        database: SourceId,
        /// JSON type name of the offending value
        found: &'static str,
    },
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize one raw record from `source` into a canonical publication.
///
/// Missing and unmapped attributes become the unknown sentinel; only a
/// structurally malformed record (not an object) is an error.
pub fn normalize(source: SourceId, raw: &Value) -> Result<Publication, NormalizeError> {
    let record = raw.as_object().ok_or(NormalizeError::NotARecord {
        database: source,
        found: json_type_name(raw),
    })?;

    let attr = |field: CanonicalField| -> Option<&Value> {
        raw_attribute(source, field).and_then(|name| record.get(name))
    };

    let mut publication = Publication::new(source);
    publication.title = attr(CanonicalField::Title)
        .and_then(coerce::as_text)
        .unwrap_or_default();
    publication.authors = attr(CanonicalField::Authors)
        .map(coerce::as_authors)
        .unwrap_or_default();
    publication.year = attr(CanonicalField::Year).and_then(coerce::as_year);
    publication.journal = attr(CanonicalField::Journal).and_then(coerce::as_text);
    publication.doi = attr(CanonicalField::Doi).and_then(coerce::as_text);
    publication.abstract_text = attr(CanonicalField::Abstract).and_then(coerce::as_text);
    publication.pub_type = attr(CanonicalField::Type).and_then(coerce::as_text);
    publication.language = attr(CanonicalField::Language).and_then(coerce::as_text);

    Ok(publication)
}
