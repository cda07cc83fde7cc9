//! Canonical publication model shared by every database.

use serde::{Deserialize, Serialize};

/// The academic database a publication was retrieved from.
///
/// This is a closed set: screening logic only ever sees these variants, and
/// adding a database means adding a variant here plus one field table in
/// [`crate::normalize::fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    PubMed,
    CrossRef,
    Arxiv,
    Core,
    SemanticScholar,
    Ieee,
    Springer,
    Dblp,
    Scopus,
}

impl SourceId {
    /// All supported databases, in registry order.
    pub const ALL: [SourceId; 9] = [
        SourceId::PubMed,
        SourceId::CrossRef,
        SourceId::Arxiv,
        SourceId::Core,
        SourceId::SemanticScholar,
        SourceId::Ieee,
        SourceId::Springer,
        SourceId::Dblp,
        SourceId::Scopus,
    ];

    /// Returns the display name of the database
    pub fn name(&self) -> &'static str {
        match self {
            SourceId::PubMed => "PubMed",
            SourceId::CrossRef => "CrossRef",
            SourceId::Arxiv => "arXiv",
            SourceId::Core => "CORE",
            SourceId::SemanticScholar => "SemanticScholar",
            SourceId::Ieee => "IEEE",
            SourceId::Springer => "Springer",
            SourceId::Dblp => "DBLP",
            SourceId::Scopus => "Scopus",
        }
    }

    /// Returns the machine identifier (for logging and config env keys)
    pub fn id(&self) -> &'static str {
        match self {
            SourceId::PubMed => "pubmed",
            SourceId::CrossRef => "crossref",
            SourceId::Arxiv => "arxiv",
            SourceId::Core => "core",
            SourceId::SemanticScholar => "semanticscholar",
            SourceId::Ieee => "ieee",
            SourceId::Springer => "springer",
            SourceId::Dblp => "dblp",
            SourceId::Scopus => "scopus",
        }
    }

    /// Parse a database name as it appears in configuration files.
    ///
    /// Case-insensitive. Accepts both display names and machine ids, plus
    /// the source labels Europe PMC uses in its own result records
    /// ("MED", "PMC", "PMCID" all resolve to PubMed).
    pub fn parse(name: &str) -> Option<SourceId> {
        match name.trim().to_lowercase().as_str() {
            "pubmed" | "med" | "pmc" | "pmcid" | "europepmc" | "europe pmc" => {
                Some(SourceId::PubMed)
            }
            "crossref" => Some(SourceId::CrossRef),
            "arxiv" => Some(SourceId::Arxiv),
            "core" => Some(SourceId::Core),
            "semanticscholar" | "semantic scholar" => Some(SourceId::SemanticScholar),
            "ieee" => Some(SourceId::Ieee),
            "springer" => Some(SourceId::Springer),
            "dblp" => Some(SourceId::Dblp),
            "scopus" => Some(SourceId::Scopus),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A publication in canonical form, regardless of which database returned it.
///
/// Every raw record is normalized into this shape exactly once, at the
/// boundary; nothing downstream branches on database-specific schemas again.
/// `None` is the "unknown" sentinel for attributes a database does not
/// expose. Instances are immutable after normalization — the evaluator and
/// aggregator attach derived data alongside, never into, the publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Title text (empty if the source had none)
    pub title: String,

    /// Author names in source order (possibly empty)
    pub authors: Vec<String>,

    /// Publication year
    pub year: Option<i32>,

    /// Journal or venue name
    pub journal: Option<String>,

    /// Digital Object Identifier
    pub doi: Option<String>,

    /// Abstract text
    pub abstract_text: Option<String>,

    /// Database the record came from
    pub source: SourceId,

    /// Publication type as reported by the source (e.g. "journal-article")
    pub pub_type: Option<String>,

    /// Publication language as reported by the source
    pub language: Option<String>,
}

impl Publication {
    /// Create an empty publication attributed to a source.
    ///
    /// All optional attributes start as unknown; the normalizer fills in
    /// whatever the source supports.
    pub fn new(source: SourceId) -> Self {
        Self {
            title: String::new(),
            authors: Vec::new(),
            year: None,
            journal: None,
            doi: None,
            abstract_text: None,
            source,
            pub_type: None,
            language: None,
        }
    }

    /// Author names joined for display and CSV output.
    pub fn authors_joined(&self) -> String {
        self.authors.join("; ")
    }
}
