//! Fetch orchestration: every planned database, one batch each.
//!
//! This is the only place transport outcomes are decided. Key-required
//! databases with no configured key never hit the network; transport
//! failures that survive the retry layer turn into skip batches so the
//! breakdown can report them instead of dropping them.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::config::RunPlan;
use crate::criteria::CombinationLogic;
use crate::models::SearchQuery;
use crate::prisma::SourceBatch;
use crate::sources::SourceRegistry;

/// Marker recorded for databases that need a key none was configured for
pub const SKIP_NO_API_KEY: &str = "skipped: no API key";

/// Fetch raw records from every database in the plan, in plan order.
///
/// Databases are queried one at a time; provider rate limits bite much
/// earlier than this loop does.
pub async fn fetch_all(
    registry: &SourceRegistry,
    plan: &RunPlan,
    logic: CombinationLogic,
    page_size: usize,
    show_progress: bool,
) -> Vec<SourceBatch> {
    let mut batches = Vec::with_capacity(plan.sources.len());

    for &source in &plan.sources {
        let Some(client) = registry.get(source) else {
            // Registry::new covers every SourceId; a custom registry that
            // does not is reported, not ignored.
            batches.push(SourceBatch::skipped(source, "skipped: no client registered"));
            continue;
        };

        let api_key = plan.api_keys.get(&source).cloned();
        if client.requires_api_key() && api_key.is_none() {
            tracing::warn!(source = source.name(), "no API key configured, skipping");
            batches.push(SourceBatch::skipped(source, SKIP_NO_API_KEY));
            continue;
        }

        let mut query = SearchQuery::new(plan.keywords.clone())
            .logic(logic)
            .page_size(page_size)
            .year_range(plan.year_range);
        if let Some(key) = api_key {
            query = query.api_key(key);
        }

        let spinner = make_spinner(source.name(), show_progress);
        match client.search(&query).await {
            Ok(records) => {
                spinner.finish_with_message(format!(
                    "{}: {} records",
                    source.name(),
                    records.len()
                ));
                batches.push(SourceBatch::records(source, records));
            }
            Err(err) => {
                spinner.finish_with_message(format!("{}: failed ({})", source.name(), err));
                tracing::warn!(source = source.name(), error = %err, "search failed, skipping");
                batches.push(SourceBatch::skipped(source, format!("skipped: {}", err)));
            }
        }
    }

    batches
}

fn make_spinner(name: &str, show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("searching {}...", name));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YearRange;
    use crate::models::SourceId;
    use crate::prisma::BatchOutcome;
    use crate::sources::MockSource;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn plan(sources: Vec<SourceId>, api_keys: HashMap<SourceId, String>) -> RunPlan {
        RunPlan {
            keywords: vec!["screening".to_string()],
            keywords_expanded: false,
            year_range: YearRange::new(2015, 2025).unwrap(),
            inclusion_criteria: Vec::new(),
            exclusion_criteria: Vec::new(),
            sources,
            api_keys,
        }
    }

    #[tokio::test]
    async fn test_fetch_all_skips_key_required_sources_without_key() {
        let mut registry = SourceRegistry::new();
        let mock = MockSource::requiring_key(SourceId::Ieee);
        mock.set_records(vec![json!({"title": "never returned"})]);
        registry.register(Arc::new(mock));

        let batches = fetch_all(
            &registry,
            &plan(vec![SourceId::Ieee], HashMap::new()),
            CombinationLogic::Or,
            10,
            false,
        )
        .await;

        assert_eq!(batches.len(), 1);
        match &batches[0].outcome {
            BatchOutcome::Skipped(reason) => assert_eq!(reason, SKIP_NO_API_KEY),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_returns_records_in_plan_order() {
        let mut registry = SourceRegistry::new();
        let pubmed = MockSource::new(SourceId::PubMed);
        pubmed.set_records(vec![json!({"title": "a"}), json!({"title": "b"})]);
        registry.register(Arc::new(pubmed));
        let dblp = MockSource::new(SourceId::Dblp);
        dblp.set_records(vec![json!({"title": "c"})]);
        registry.register(Arc::new(dblp));

        let batches = fetch_all(
            &registry,
            &plan(vec![SourceId::Dblp, SourceId::PubMed], HashMap::new()),
            CombinationLogic::Or,
            10,
            false,
        )
        .await;

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].source, SourceId::Dblp);
        assert_eq!(batches[1].source, SourceId::PubMed);
        match &batches[1].outcome {
            BatchOutcome::Records(records) => assert_eq!(records.len(), 2),
            other => panic!("expected records, got {:?}", other),
        }
    }
}
