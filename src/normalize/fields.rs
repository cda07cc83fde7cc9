//! Per-database field tables mapping canonical attributes to wire names.
//!
//! Each database returns records in its own schema; these tables say which
//! raw attribute, if any, carries each canonical publication attribute.
//! `None` means the database does not expose that attribute and
//! normalization leaves it unknown. Adding a database means adding one
//! table here — no evaluator or normalizer code changes.

use crate::models::SourceId;

/// Canonical publication attributes the normalizer fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Title,
    Authors,
    Year,
    Journal,
    Doi,
    Abstract,
    Type,
    Language,
}

/// Look up the raw attribute name carrying `field` in `source` records.
pub fn raw_attribute(source: SourceId, field: CanonicalField) -> Option<&'static str> {
    use CanonicalField::*;

    match source {
        // Europe PMC REST search results
        SourceId::PubMed => match field {
            Title => Some("title"),
            Authors => Some("authorString"),
            Year => Some("pubYear"),
            Journal => Some("journalTitle"),
            Doi => Some("doi"),
            Abstract => Some("abstractText"),
            Type => Some("pubType"),
            Language => Some("language"),
        },
        // CrossRef /works items: titles and venues are arrays, dates are
        // date-parts objects
        SourceId::CrossRef => match field {
            Title => Some("title"),
            Authors => Some("author"),
            Year => Some("issued"),
            Journal => Some("container-title"),
            Doi => Some("DOI"),
            Abstract => Some("abstract"),
            Type => Some("type"),
            Language => Some("language"),
        },
        // arXiv Atom entries, flattened by the client. The feed carries no
        // venue, publication type, or language.
        SourceId::Arxiv => match field {
            Title => Some("title"),
            Authors => Some("authors"),
            Year => Some("published"),
            Journal => None,
            Doi => Some("doi"),
            Abstract => Some("summary"),
            Type => None,
            Language => None,
        },
        // CORE v3 search/works results
        SourceId::Core => match field {
            Title => Some("title"),
            Authors => Some("authors"),
            Year => Some("yearPublished"),
            Journal => Some("publisher"),
            Doi => Some("doi"),
            Abstract => Some("abstract"),
            Type => Some("documentType"),
            Language => Some("language"),
        },
        // Semantic Scholar graph API paper objects (requested fields only)
        SourceId::SemanticScholar => match field {
            Title => Some("title"),
            Authors => Some("authors"),
            Year => Some("year"),
            Journal => Some("venue"),
            Doi => None,
            Abstract => Some("abstract"),
            Type => None,
            Language => None,
        },
        // IEEE Xplore article objects
        SourceId::Ieee => match field {
            Title => Some("title"),
            Authors => Some("authors"),
            Year => Some("publication_date"),
            Journal => Some("publication_title"),
            Doi => Some("doi"),
            Abstract => Some("abstract"),
            Type => Some("content_type"),
            Language => None,
        },
        // Springer Meta v2 records
        SourceId::Springer => match field {
            Title => Some("title"),
            Authors => Some("creators"),
            Year => Some("publicationDate"),
            Journal => Some("publicationName"),
            Doi => Some("doi"),
            Abstract => Some("abstract"),
            Type => Some("contentType"),
            Language => Some("language"),
        },
        // DBLP hit `info` objects
        SourceId::Dblp => match field {
            Title => Some("title"),
            Authors => Some("authors"),
            Year => Some("year"),
            Journal => Some("venue"),
            Doi => Some("doi"),
            Abstract => None,
            Type => Some("type"),
            Language => None,
        },
        // Scopus search entries (prism/dc namespaces)
        SourceId::Scopus => match field {
            Title => Some("dc:title"),
            Authors => Some("author"),
            Year => Some("prism:coverDate"),
            Journal => Some("prism:publicationName"),
            Doi => Some("prism:doi"),
            Abstract => None,
            Type => Some("prism:aggregationType"),
            Language => None,
        },
    }
}
