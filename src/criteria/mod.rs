//! Inclusion/exclusion criteria: parsing and evaluation.
//!
//! Criteria arrive from configuration as loose `field:value` strings
//! ("language:english", "type:journal-article", or a bare "journal" which
//! defaults to the `type` field). [`parse_criteria`] turns them into
//! structured [`Criterion`] values; [`evaluator::classify`] applies them to
//! canonical publications.

mod evaluator;

pub use evaluator::{classify, ClassificationResult, Disposition, ExclusionReason};

use serde::{Deserialize, Serialize};

use crate::config::YearRange;
use crate::models::Publication;

/// How multiple criteria in one list combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CombinationLogic {
    /// Every criterion in the list must match to trigger the list's effect
    And,
    /// At least one criterion must match
    Or,
}

impl Default for CombinationLogic {
    fn default() -> Self {
        CombinationLogic::Or
    }
}

/// The publication attribute a criterion tests.
///
/// `type`, `language` and `source` match by normalized equality; `journal`
/// and `authors` by case-insensitive containment. Anything the parser does
/// not recognize degrades to [`CriterionField::Keyword`], which matches
/// against title and abstract text, so a typo in configuration widens a
/// criterion instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionField {
    Type,
    Language,
    Source,
    Journal,
    Authors,
    Keyword(String),
}

impl CriterionField {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            // publication_type / pubtype / document_type are the field
            // aliases the databases themselves use for `type`
            "type" | "publication_type" | "pubtype" | "document_type" => CriterionField::Type,
            "language" => CriterionField::Language,
            "source" => CriterionField::Source,
            "journal" => CriterionField::Journal,
            "authors" => CriterionField::Authors,
            other => CriterionField::Keyword(other.to_string()),
        }
    }

    /// Canonical name used when rendering the criterion back to text.
    pub fn name(&self) -> &str {
        match self {
            CriterionField::Type => "type",
            CriterionField::Language => "language",
            CriterionField::Source => "source",
            CriterionField::Journal => "journal",
            CriterionField::Authors => "authors",
            CriterionField::Keyword(raw) => raw,
        }
    }
}

/// One parsed `field:value` test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub field: CriterionField,
    /// Trimmed, lowercased match value
    pub value: String,
}

impl Criterion {
    pub fn new(field: CriterionField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into().trim().to_lowercase(),
        }
    }

    /// Whether this criterion matches the publication.
    ///
    /// Unknown publication attributes never match: a publication without a
    /// journal fails every `journal:` test silently, so sparse source data
    /// can neither satisfy inclusion nor trigger exclusion on that field.
    pub fn matches(&self, publication: &Publication) -> bool {
        match &self.field {
            CriterionField::Type => eq_normalized(publication.pub_type.as_deref(), &self.value),
            CriterionField::Language => eq_normalized(publication.language.as_deref(), &self.value),
            CriterionField::Source => {
                let value = self.value.as_str();
                publication.source.name().to_lowercase() == value
                    || publication.source.id() == value
            }
            CriterionField::Journal => contains_normalized(publication.journal.as_deref(), &self.value),
            CriterionField::Authors => publication
                .authors
                .iter()
                .any(|author| author.to_lowercase().contains(&self.value)),
            CriterionField::Keyword(_) => {
                let title = publication.title.to_lowercase();
                title.contains(&self.value)
                    || contains_normalized(publication.abstract_text.as_deref(), &self.value)
            }
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field.name(), self.value)
    }
}

fn eq_normalized(attribute: Option<&str>, value: &str) -> bool {
    attribute.map_or(false, |attr| attr.trim().to_lowercase() == value)
}

fn contains_normalized(attribute: Option<&str>, value: &str) -> bool {
    attribute.map_or(false, |attr| attr.to_lowercase().contains(value))
}

/// Parse raw criteria strings into structured criteria.
///
/// Each entry splits on the first colon. Entries without a colon default to
/// the `type` field, so a plain `"journal"` keeps meaning `type:journal`.
/// Order is preserved.
pub fn parse_criteria(raw: &[String]) -> Vec<Criterion> {
    raw.iter()
        .map(|entry| {
            let entry = entry.trim();
            match entry.split_once(':') {
                Some((prefix, value)) => Criterion::new(
                    CriterionField::from_prefix(&prefix.trim().to_lowercase()),
                    value,
                ),
                None => Criterion::new(CriterionField::Type, entry),
            }
        })
        .collect()
}

/// Inclusion and exclusion criteria plus the knobs that govern evaluation.
///
/// The year filter arrives here already validated by the configuration
/// layer; evaluation never parses date text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaSet {
    pub inclusion: Vec<Criterion>,
    pub exclusion: Vec<Criterion>,
    pub logic: CombinationLogic,
    pub year_range: Option<YearRange>,
}

impl CriteriaSet {
    /// Build a criteria set from raw configuration strings.
    pub fn from_raw(
        inclusion: &[String],
        exclusion: &[String],
        logic: CombinationLogic,
        year_range: Option<YearRange>,
    ) -> Self {
        Self {
            inclusion: parse_criteria(inclusion),
            exclusion: parse_criteria(exclusion),
            logic,
            year_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceId;

    fn strings(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_field_prefixes() {
        let parsed = parse_criteria(&strings(&[
            "type:journal-article",
            "language:english",
            "journal:nature",
            "authors:smith",
            "source:pubmed",
        ]));
        assert_eq!(parsed[0].field, CriterionField::Type);
        assert_eq!(parsed[1].field, CriterionField::Language);
        assert_eq!(parsed[2].field, CriterionField::Journal);
        assert_eq!(parsed[3].field, CriterionField::Authors);
        assert_eq!(parsed[4].field, CriterionField::Source);
    }

    #[test]
    fn test_bare_value_defaults_to_type() {
        // backward compatible: parse(["journal"]) == parse(["type:journal"])
        let bare = parse_criteria(&strings(&["journal"]));
        let prefixed = parse_criteria(&strings(&["type:journal"]));
        assert_eq!(bare, prefixed);
    }

    #[test]
    fn test_type_aliases() {
        for alias in ["publication_type:review", "pubtype:review", "document_type:review"] {
            let parsed = parse_criteria(&strings(&[alias]));
            assert_eq!(parsed[0].field, CriterionField::Type);
            assert_eq!(parsed[0].value, "review");
        }
    }

    #[test]
    fn test_unrecognized_prefix_degrades_to_keyword() {
        let parsed = parse_criteria(&strings(&["venue:neurips"]));
        assert_eq!(parsed[0].field, CriterionField::Keyword("venue".to_string()));
        assert_eq!(parsed[0].value, "neurips");
    }

    #[test]
    fn test_value_keeps_remaining_colons() {
        let parsed = parse_criteria(&strings(&["journal:nature: genetics"]));
        assert_eq!(parsed[0].value, "nature: genetics");
    }

    #[test]
    fn test_parse_is_deterministic_and_ordered() {
        let raw = strings(&["b", "a", "language:english"]);
        assert_eq!(parse_criteria(&raw), parse_criteria(&raw));
        assert_eq!(parse_criteria(&raw)[0].value, "b");
    }

    #[test]
    fn test_type_matches_by_equality_not_containment() {
        let mut publication = Publication::new(SourceId::CrossRef);
        publication.pub_type = Some("journal-article".to_string());

        assert!(Criterion::new(CriterionField::Type, "Journal-Article").matches(&publication));
        assert!(!Criterion::new(CriterionField::Type, "journal").matches(&publication));
    }

    #[test]
    fn test_journal_matches_by_containment() {
        let mut publication = Publication::new(SourceId::CrossRef);
        publication.journal = Some("Nature Machine Intelligence".to_string());

        assert!(Criterion::new(CriterionField::Journal, "nature").matches(&publication));
        assert!(!Criterion::new(CriterionField::Journal, "science").matches(&publication));
    }

    #[test]
    fn test_authors_matches_any_author() {
        let mut publication = Publication::new(SourceId::Dblp);
        publication.authors = vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()];

        assert!(Criterion::new(CriterionField::Authors, "turing").matches(&publication));
        assert!(!Criterion::new(CriterionField::Authors, "hopper").matches(&publication));
    }

    #[test]
    fn test_source_matches_name_and_id() {
        let publication = Publication::new(SourceId::PubMed);
        assert!(Criterion::new(CriterionField::Source, "PubMed").matches(&publication));
        assert!(Criterion::new(CriterionField::Source, "pubmed").matches(&publication));
        assert!(!Criterion::new(CriterionField::Source, "arxiv").matches(&publication));
    }

    #[test]
    fn test_keyword_matches_title_and_abstract() {
        let mut publication = Publication::new(SourceId::Arxiv);
        publication.title = "Graph neural networks".to_string();
        publication.abstract_text = Some("We study message passing.".to_string());

        let criterion = Criterion::new(CriterionField::Keyword("venue".to_string()), "neural");
        assert!(criterion.matches(&publication));

        let criterion = Criterion::new(CriterionField::Keyword("venue".to_string()), "message");
        assert!(criterion.matches(&publication));

        let criterion = Criterion::new(CriterionField::Keyword("venue".to_string()), "transformer");
        assert!(!criterion.matches(&publication));
    }

    #[test]
    fn test_unknown_attribute_never_matches() {
        // Publication with unknown journal: no journal criterion can match,
        // and matching must not error.
        let publication = Publication::new(SourceId::Arxiv);
        assert!(!Criterion::new(CriterionField::Journal, "nature").matches(&publication));
        assert!(!Criterion::new(CriterionField::Language, "english").matches(&publication));
        assert!(!Criterion::new(CriterionField::Type, "preprint").matches(&publication));
    }

    #[test]
    fn test_criterion_display() {
        let criterion = Criterion::new(CriterionField::Language, "Non-English");
        assert_eq!(criterion.to_string(), "language:non-english");
    }
}
