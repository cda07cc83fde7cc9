//! The screening pipeline: normalize, classify, and tally fetched records.
//!
//! Transport happens before this module runs; screening itself is pure and
//! synchronous. Batches are processed in arrival order, one at a time, so
//! the aggregator sees exactly one writer.

use serde_json::Value;

use crate::criteria::{classify, ClassificationResult, CriteriaSet};
use crate::models::{Publication, SourceId};
use crate::normalize::normalize;
use crate::prisma::{CriteriaCounts, PrismaAggregator};

/// What one database contributed to the run.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Raw records as returned by the client
    Records(Vec<Value>),
    /// The database was skipped before any records arrived (missing API
    /// key, transport failure after retries)
    Skipped(String),
}

/// Fetched input for one database.
#[derive(Debug)]
pub struct SourceBatch {
    pub source: SourceId,
    pub outcome: BatchOutcome,
}

impl SourceBatch {
    pub fn records(source: SourceId, records: Vec<Value>) -> Self {
        Self {
            source,
            outcome: BatchOutcome::Records(records),
        }
    }

    pub fn skipped(source: SourceId, reason: impl Into<String>) -> Self {
        Self {
            source,
            outcome: BatchOutcome::Skipped(reason.into()),
        }
    }
}

/// Everything downstream reporting needs from one run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Final counter snapshot
    pub counts: CriteriaCounts,
    /// Every screened publication with its classification, in arrival order
    pub classified: Vec<(Publication, ClassificationResult)>,
    /// Databases that contributed nothing, with reasons
    pub skipped: Vec<(SourceId, String)>,
}

/// Screen every fetched batch against the criteria set.
///
/// Malformed records are logged and skipped individually; nothing in here
/// aborts the run.
pub fn screen(batches: Vec<SourceBatch>, criteria: &CriteriaSet) -> RunOutcome {
    let mut aggregator = PrismaAggregator::new();
    let mut classified = Vec::new();
    let mut skipped = Vec::new();

    for batch in batches {
        match batch.outcome {
            BatchOutcome::Skipped(reason) => {
                tracing::warn!(source = batch.source.name(), reason = %reason, "database skipped");
                aggregator.mark_skipped(batch.source, reason.clone());
                skipped.push((batch.source, reason));
            }
            BatchOutcome::Records(records) => {
                tracing::info!(
                    source = batch.source.name(),
                    records = records.len(),
                    "screening batch"
                );
                for raw in &records {
                    match normalize(batch.source, raw) {
                        Ok(publication) => {
                            let result = classify(&publication, criteria);
                            aggregator.record(&publication, &result);
                            classified.push((publication, result));
                        }
                        Err(err) => {
                            tracing::warn!(
                                source = batch.source.name(),
                                error = %err,
                                "skipping malformed record"
                            );
                        }
                    }
                }
            }
        }
    }

    RunOutcome {
        counts: aggregator.snapshot(),
        classified,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CombinationLogic;
    use serde_json::json;

    fn strings(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn pubmed_record(pub_type: &str, language: &str) -> Value {
        json!({
            "title": format!("{} about topic", pub_type),
            "authorString": "Doe J",
            "pubYear": "2020",
            "journalTitle": "Journal of Things",
            "language": language,
            "pubType": pub_type,
        })
    }

    #[test]
    fn test_screen_mixed_batches() {
        let criteria = CriteriaSet::from_raw(
            &strings(&["type:journal-article"]),
            &strings(&["language:non-english"]),
            CombinationLogic::Or,
            None,
        );

        let batches = vec![
            SourceBatch::skipped(SourceId::Ieee, "skipped: no API key"),
            SourceBatch::records(
                SourceId::PubMed,
                vec![
                    pubmed_record("journal-article", "english"),
                    pubmed_record("journal-article", "non-english"),
                    pubmed_record("editorial", "english"),
                ],
            ),
        ];

        let outcome = screen(batches, &criteria);

        assert_eq!(outcome.counts.total_identified, 3);
        assert_eq!(outcome.counts.total_included, 1);
        assert_eq!(outcome.counts.total_excluded, 2);
        assert_eq!(outcome.classified.len(), 3);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].0, SourceId::Ieee);

        let ieee = &outcome.counts.per_source["IEEE"];
        assert_eq!(ieee.skipped.as_deref(), Some("skipped: no API key"));
        assert_eq!(ieee.counts.identified, 0);
    }

    #[test]
    fn test_malformed_record_skipped_not_fatal() {
        let criteria = CriteriaSet::from_raw(&[], &[], CombinationLogic::Or, None);
        let batches = vec![SourceBatch::records(
            SourceId::PubMed,
            vec![json!("not a record"), pubmed_record("journal-article", "english")],
        )];

        let outcome = screen(batches, &criteria);
        assert_eq!(outcome.counts.total_identified, 1);
        assert_eq!(outcome.classified.len(), 1);
    }

    #[test]
    fn test_empty_batch_contributes_source_entry_only_when_skipped() {
        let criteria = CriteriaSet::from_raw(&[], &[], CombinationLogic::Or, None);
        let outcome = screen(
            vec![SourceBatch::records(SourceId::Dblp, Vec::new())],
            &criteria,
        );
        assert_eq!(outcome.counts.total_identified, 0);
        assert!(outcome.skipped.is_empty());
    }
}
