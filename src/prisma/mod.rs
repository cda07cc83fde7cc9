//! PRISMA flow accounting: stage counters and per-database breakdown.

mod pipeline;

pub use pipeline::{screen, BatchOutcome, RunOutcome, SourceBatch};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::criteria::{ClassificationResult, Disposition};
use crate::models::{Publication, SourceId};

/// Counter block shared by the global totals and each database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub identified: u64,
    pub screened: u64,
    pub included: u64,
    pub excluded: u64,
}

/// Per-database slice of the flow, including the skip marker for
/// databases that contributed nothing (e.g. no API key configured).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCounts {
    #[serde(flatten)]
    pub counts: StageCounts,
    pub excluded_by_reason: BTreeMap<String, u64>,
    /// Reason the database was skipped entirely, when it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

/// Cumulative PRISMA counters for one search run.
///
/// After a full pass `total_identified == total_included + total_excluded`
/// and every per-database block sums to the corresponding total. Reason
/// buckets count every matched reason, so they may exceed
/// `total_excluded` when publications match several exclusion criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaCounts {
    pub total_identified: u64,
    pub total_screened: u64,
    pub total_included: u64,
    pub total_excluded: u64,
    pub excluded_by_reason: BTreeMap<String, u64>,
    /// Keyed by database display name for stable report ordering
    pub per_source: BTreeMap<String, SourceCounts>,
}

/// Single sink of truth for screening statistics.
///
/// Created fresh for each run and mutated by exactly one writer: callers
/// that fetch concurrently must serialize `record` behind a queue or lock,
/// or the counter invariants above stop holding. Publications must be
/// recorded at most once; nothing here deduplicates.
#[derive(Debug, Default)]
pub struct PrismaAggregator {
    counts: CriteriaCounts,
}

impl PrismaAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified publication.
    pub fn record(&mut self, publication: &Publication, result: &ClassificationResult) {
        let per_source = self
            .counts
            .per_source
            .entry(publication.source.name().to_string())
            .or_default();

        self.counts.total_identified += 1;
        self.counts.total_screened += 1;
        per_source.counts.identified += 1;
        per_source.counts.screened += 1;

        match result.disposition {
            Disposition::Included => {
                self.counts.total_included += 1;
                per_source.counts.included += 1;
            }
            Disposition::Excluded => {
                self.counts.total_excluded += 1;
                per_source.counts.excluded += 1;
                for reason in &result.reasons {
                    let label = reason.to_string();
                    *self.counts.excluded_by_reason.entry(label.clone()).or_insert(0) += 1;
                    *per_source.excluded_by_reason.entry(label).or_insert(0) += 1;
                }
            }
        }
    }

    /// Record a database that was skipped before contributing any records.
    ///
    /// Skipped databases still appear in the breakdown, with zero counts
    /// and an explicit marker, never silently absent.
    pub fn mark_skipped(&mut self, source: SourceId, reason: impl Into<String>) {
        self.counts
            .per_source
            .entry(source.name().to_string())
            .or_default()
            .skipped = Some(reason.into());
    }

    /// Read-only snapshot, safe at any point during a run.
    pub fn snapshot(&self) -> CriteriaCounts {
        self.counts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{classify, CombinationLogic, CriteriaSet};

    fn strings(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn publication(source: SourceId, pub_type: &str, language: &str) -> Publication {
        let mut publication = Publication::new(source);
        publication.title = format!("{} paper", pub_type);
        publication.pub_type = Some(pub_type.to_string());
        publication.language = Some(language.to_string());
        publication
    }

    fn record_all(aggregator: &mut PrismaAggregator, publications: &[Publication], set: &CriteriaSet) {
        for p in publications {
            let result = classify(p, set);
            aggregator.record(p, &result);
        }
    }

    #[test]
    fn test_counter_invariant_holds() {
        let set = CriteriaSet::from_raw(
            &strings(&["type:journal-article"]),
            &strings(&["language:non-english"]),
            CombinationLogic::Or,
            None,
        );
        let publications = vec![
            publication(SourceId::PubMed, "journal-article", "english"),
            publication(SourceId::PubMed, "journal-article", "non-english"),
            publication(SourceId::CrossRef, "preprint", "english"),
            publication(SourceId::CrossRef, "journal-article", "english"),
        ];

        let mut aggregator = PrismaAggregator::new();
        record_all(&mut aggregator, &publications, &set);
        let counts = aggregator.snapshot();

        assert_eq!(counts.total_identified, 4);
        assert_eq!(counts.total_screened, 4);
        assert_eq!(
            counts.total_identified,
            counts.total_included + counts.total_excluded
        );

        let per_source_identified: u64 =
            counts.per_source.values().map(|s| s.counts.identified).sum();
        let per_source_included: u64 =
            counts.per_source.values().map(|s| s.counts.included).sum();
        let per_source_excluded: u64 =
            counts.per_source.values().map(|s| s.counts.excluded).sum();
        assert_eq!(per_source_identified, counts.total_identified);
        assert_eq!(per_source_included, counts.total_included);
        assert_eq!(per_source_excluded, counts.total_excluded);
    }

    #[test]
    fn test_reason_buckets_count_every_match() {
        let set = CriteriaSet::from_raw(
            &[],
            &strings(&["language:non-english", "type:preprint"]),
            CombinationLogic::Or,
            None,
        );
        // Matches both exclusion criteria: one excluded publication, two
        // reason-bucket increments.
        let p = publication(SourceId::Arxiv, "preprint", "non-english");
        let mut aggregator = PrismaAggregator::new();
        let result = classify(&p, &set);
        aggregator.record(&p, &result);

        let counts = aggregator.snapshot();
        assert_eq!(counts.total_excluded, 1);
        assert_eq!(counts.excluded_by_reason.len(), 2);
        assert_eq!(counts.excluded_by_reason["language:non-english"], 1);
        assert_eq!(counts.excluded_by_reason["type:preprint"], 1);
    }

    #[test]
    fn test_skipped_source_has_marker_and_zero_counts() {
        let mut aggregator = PrismaAggregator::new();
        aggregator.mark_skipped(SourceId::Ieee, "skipped: no API key");

        let counts = aggregator.snapshot();
        let ieee = &counts.per_source["IEEE"];
        assert_eq!(ieee.skipped.as_deref(), Some("skipped: no API key"));
        assert_eq!(ieee.counts, StageCounts::default());
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let set = CriteriaSet::from_raw(&[], &[], CombinationLogic::Or, None);
        let p = publication(SourceId::Dblp, "article", "english");
        let mut aggregator = PrismaAggregator::new();
        let result = classify(&p, &set);
        aggregator.record(&p, &result);

        assert_eq!(aggregator.snapshot(), aggregator.snapshot());
    }
}
