//! Configuration loading and validation.
//!
//! The search is driven by a JSON configuration file (see `sample_input.json`)
//! plus `PRISMA_SEARCH_*` environment overrides. Everything is validated
//! here, before any network request or classification: screening itself
//! never parses configuration text, it consumes the resolved [`RunPlan`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::keywords::expand_keywords;
use crate::models::SourceId;

/// Configuration-level failure, surfaced before a run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid date range '{raw}': expected 'YYYY-YYYY' or 'YYYY' with 4-digit years")]
    InvalidDateRange { raw: String },

    #[error("invalid date range '{raw}': start year {start} is after end year {end}")]
    ReversedDateRange { raw: String, start: i32, end: i32 },

    #[error(
        "unknown database '{name}'; supported databases: PubMed, CrossRef, arXiv, CORE, \
         SemanticScholar, IEEE, Springer, DBLP, Scopus"
    )]
    UnknownDatabase { name: String },

    #[error("either 'research_topic' or non-empty 'keywords' must be provided")]
    MissingKeywords,
}

/// Inclusive publication-year window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::ReversedDateRange {
                raw: format!("{}-{}", start, end),
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    /// Parse configuration text: `"2015-2025"` or a single `"2020"`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDateRange {
            raw: raw.to_string(),
        };
        let parse_year = |text: &str| -> Result<i32, ConfigError> {
            let year: i32 = text.trim().parse().map_err(|_| invalid())?;
            if !(1000..=9999).contains(&year) {
                return Err(invalid());
            }
            Ok(year)
        };

        match raw.trim().split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse_year(start)?, parse_year(end)?);
                if start > end {
                    return Err(ConfigError::ReversedDateRange {
                        raw: raw.to_string(),
                        start,
                        end,
                    });
                }
                Ok(Self { start, end })
            }
            None => {
                let year = parse_year(raw)?;
                Ok(Self {
                    start: year,
                    end: year,
                })
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Keywords as they appear in configuration: a list or a comma-separated
/// string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordsSpec {
    List(Vec<String>),
    Text(String),
}

impl KeywordsSpec {
    fn into_list(self) -> Vec<String> {
        let entries = match self {
            KeywordsSpec::List(entries) => entries,
            KeywordsSpec::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        entries
            .into_iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect()
    }
}

/// The PRISMA parameters block of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrismaValues {
    pub inclusion_criteria: Vec<String>,
    pub exclusion_criteria: Vec<String>,
    #[serde(default = "default_databases")]
    pub databases: Vec<String>,
    pub date_range: String,
}

fn default_databases() -> Vec<String> {
    vec!["PubMed".to_string()]
}

/// Raw deserialized configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub research_topic: Option<String>,

    #[serde(default)]
    pub keywords: Option<KeywordsSpec>,

    pub initial_prisma_values: PrismaValues,

    /// Database display name to API key
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

/// Fully validated inputs for one search run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub keywords: Vec<String>,
    /// True when keywords were derived from the research topic
    pub keywords_expanded: bool,
    pub year_range: YearRange,
    pub inclusion_criteria: Vec<String>,
    pub exclusion_criteria: Vec<String>,
    pub sources: Vec<SourceId>,
    pub api_keys: HashMap<SourceId, String>,
}

impl SearchConfig {
    /// Validate and resolve into a run plan.
    ///
    /// Every configuration problem surfaces here; once this returns `Ok`,
    /// nothing downstream re-validates configuration text.
    pub fn resolve(self) -> Result<RunPlan, ConfigError> {
        let year_range = YearRange::parse(&self.initial_prisma_values.date_range)?;

        let mut sources = Vec::new();
        for name in &self.initial_prisma_values.databases {
            let source = SourceId::parse(name).ok_or_else(|| ConfigError::UnknownDatabase {
                name: name.clone(),
            })?;
            if !sources.contains(&source) {
                sources.push(source);
            }
        }

        let mut api_keys = HashMap::new();
        for (name, key) in self.api_keys {
            // Empty placeholder entries count as "no key configured"
            if key.trim().is_empty() {
                continue;
            }
            match SourceId::parse(&name) {
                Some(source) => {
                    api_keys.insert(source, key);
                }
                None => {
                    tracing::warn!(database = %name, "ignoring API key for unknown database");
                }
            }
        }

        let explicit = self
            .keywords
            .map(KeywordsSpec::into_list)
            .filter(|keywords| !keywords.is_empty());
        let topic = self
            .research_topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty());

        let (keywords, keywords_expanded) = match (explicit, topic) {
            (Some(keywords), _) => (keywords, false),
            (None, Some(topic)) => {
                // Lossy fallback; a non-empty topic always yields at least
                // one keyword
                let keywords = expand_keywords(topic);
                tracing::warn!(
                    keywords = ?keywords,
                    "no keywords configured; derived from research topic"
                );
                (keywords, true)
            }
            (None, None) => return Err(ConfigError::MissingKeywords),
        };

        Ok(RunPlan {
            keywords,
            keywords_expanded,
            year_range,
            inclusion_criteria: self.initial_prisma_values.inclusion_criteria,
            exclusion_criteria: self.initial_prisma_values.exclusion_criteria,
            sources,
            api_keys,
        })
    }
}

/// Load the configuration file, applying `PRISMA_SEARCH_*` environment
/// overrides on top.
pub fn load_config(path: &Path) -> Result<SearchConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("PRISMA_SEARCH").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
