//! Integration tests for prisma-search.
//!
//! These drive the full screening path: raw records (as the database
//! clients would return them) through normalization, classification, and
//! PRISMA accounting, plus the report writers on top of the outcome.

use prisma_search::criteria::{
    classify, parse_criteria, CombinationLogic, CriteriaSet, Disposition,
};
use prisma_search::models::{Publication, SourceId};
use prisma_search::normalize::normalize;
use prisma_search::output;
use prisma_search::prisma::{screen, SourceBatch};
use serde_json::json;

fn strings(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

fn criteria_set(inclusion: &[&str], exclusion: &[&str]) -> CriteriaSet {
    CriteriaSet::from_raw(
        &strings(inclusion),
        &strings(exclusion),
        CombinationLogic::Or,
        None,
    )
}

fn publication(pub_type: Option<&str>, language: Option<&str>) -> Publication {
    let mut publication = Publication::new(SourceId::CrossRef);
    publication.title = "A publication".to_string();
    publication.pub_type = pub_type.map(str::to_string);
    publication.language = language.map(str::to_string);
    publication
}

// Scenario A: matching inclusion, no exclusion match -> included.
#[test]
fn scenario_a_inclusion_match_is_included() {
    let set = criteria_set(&["type:journal-article"], &["language:non-english"]);
    let result = classify(&publication(Some("journal-article"), Some("english")), &set);
    assert_eq!(result.disposition, Disposition::Included);
    assert!(result.reasons.is_empty());
}

// Scenario B: exclusion wins despite a perfect inclusion match.
#[test]
fn scenario_b_exclusion_wins_over_inclusion() {
    let set = criteria_set(&["type:journal-article"], &["language:non-english"]);
    let result = classify(
        &publication(Some("journal-article"), Some("non-english")),
        &set,
    );
    assert_eq!(result.disposition, Disposition::Excluded);
    assert_eq!(result.reasons.len(), 1);
    assert_eq!(result.reasons[0].to_string(), "language:non-english");
}

// Scenario C: a bare criterion defaults to the type field.
#[test]
fn scenario_c_bare_criterion_defaults_to_type() {
    assert_eq!(
        parse_criteria(&strings(&["journal"])),
        parse_criteria(&strings(&["type:journal"]))
    );

    let set = criteria_set(&["journal"], &[]);
    let result = classify(&publication(Some("journal"), None), &set);
    assert_eq!(result.disposition, Disposition::Included);
}

// Scenario D: arXiv exposes no language attribute, so language-based
// exclusion can never fire on its records.
#[test]
fn scenario_d_unmapped_language_never_matches() {
    let raw = json!({
        "title": "A preprint about non-english corpora",
        "authors": ["Doe J"],
        "published": "2021-02-03T00:00:00Z",
        "summary": "We study non-english text."
    });
    let normalized = normalize(SourceId::Arxiv, &raw).unwrap();
    assert_eq!(normalized.language, None);

    let set = criteria_set(&[], &["language:non-english"]);
    let result = classify(&normalized, &set);
    assert_eq!(result.disposition, Disposition::Included);
}

// Scenario E: one database skipped, one contributing 10 records
// (6 included, 4 excluded).
#[test]
fn scenario_e_skipped_source_and_final_counts() {
    let mut records = Vec::new();
    for i in 0..6 {
        records.push(json!({
            "title": format!("Included {}", i),
            "pubType": "journal-article",
            "language": "english",
        }));
    }
    for i in 0..4 {
        records.push(json!({
            "title": format!("Excluded {}", i),
            "pubType": "journal-article",
            "language": "non-english",
        }));
    }

    let set = criteria_set(&["type:journal-article"], &["language:non-english"]);
    let outcome = screen(
        vec![
            SourceBatch::skipped(SourceId::Ieee, "skipped: no API key"),
            SourceBatch::records(SourceId::PubMed, records),
        ],
        &set,
    );

    let counts = &outcome.counts;
    assert_eq!(counts.total_identified, 10);
    assert_eq!(counts.total_included, 6);
    assert_eq!(counts.total_excluded, 4);

    let ieee = &counts.per_source["IEEE"];
    assert_eq!(ieee.skipped.as_deref(), Some("skipped: no API key"));
    assert_eq!(ieee.counts.identified, 0);
    assert_eq!(outcome.skipped, vec![(SourceId::Ieee, "skipped: no API key".to_string())]);
}

#[test]
fn counter_invariants_hold_across_sources() {
    let set = criteria_set(&["type:journal-article"], &[]);
    let outcome = screen(
        vec![
            SourceBatch::records(
                SourceId::PubMed,
                vec![
                    json!({"title": "A", "pubType": "journal-article"}),
                    json!({"title": "B", "pubType": "editorial"}),
                ],
            ),
            SourceBatch::records(
                SourceId::Dblp,
                vec![json!({"title": "C", "type": "journal-article"})],
            ),
        ],
        &set,
    );

    let counts = &outcome.counts;
    assert_eq!(counts.total_identified, counts.total_included + counts.total_excluded);
    assert_eq!(counts.total_screened, counts.total_identified);

    let summed: u64 = counts.per_source.values().map(|s| s.counts.identified).sum();
    assert_eq!(summed, counts.total_identified);
}

#[test]
fn classification_is_deterministic_end_to_end() {
    let set = criteria_set(&["type:journal-article"], &["language:non-english"]);
    let raw = json!({
        "title": ["A study"],
        "type": "journal-article",
        "language": "non-english",
        "issued": {"date-parts": [[2020]]}
    });

    let first = classify(&normalize(SourceId::CrossRef, &raw).unwrap(), &set);
    let second = classify(&normalize(SourceId::CrossRef, &raw).unwrap(), &set);
    assert_eq!(first, second);
}

#[test]
fn unknown_journal_tolerates_journal_criteria() {
    let set = criteria_set(&[], &["journal:predatory"]);
    let normalized = normalize(SourceId::PubMed, &json!({"title": "No journal"})).unwrap();
    assert_eq!(normalized.journal, None);
    let result = classify(&normalized, &set);
    assert_eq!(result.disposition, Disposition::Included);
}

#[test]
fn reports_round_trip_through_files() {
    let set = criteria_set(&["type:journal-article"], &["language:non-english"]);
    let outcome = screen(
        vec![SourceBatch::records(
            SourceId::PubMed,
            vec![
                json!({"title": "Kept", "pubType": "journal-article", "language": "english",
                       "pubYear": "2020", "journalTitle": "J", "authorString": "Doe J"}),
                json!({"title": "Cut", "pubType": "journal-article", "language": "non-english"}),
            ],
        )],
        &set,
    );

    let dir = tempfile::tempdir().unwrap();
    let written = output::write_reports(&outcome, dir.path(), &strings(&["kw"])).unwrap();
    assert_eq!(written.len(), 5);

    let all_csv =
        std::fs::read_to_string(dir.path().join(output::ALL_PUBLICATIONS_CSV)).unwrap();
    assert!(all_csv.contains("Kept,Doe J,2020,J,Yes,Meets all criteria"));
    assert!(all_csv.contains("Cut,,,,No,language:non-english"));

    let selected_csv =
        std::fs::read_to_string(dir.path().join(output::SELECTED_PUBLICATIONS_CSV)).unwrap();
    assert!(selected_csv.contains("Kept"));
    assert!(!selected_csv.contains("Cut"));

    let results: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(output::RESULTS_JSON)).unwrap(),
    )
    .unwrap();
    assert_eq!(results["criteria_counts"]["total_identified"], 2);
    assert_eq!(results["criteria_counts"]["per_source"]["PubMed"]["included"], 1);
}
