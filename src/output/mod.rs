//! Report files written at the end of a run.
//!
//! Three CSVs and one JSON document land in the output directory:
//!
//! - `all_publications_found.csv`: every screened publication with its
//!   disposition and joined exclusion reasons
//! - `selected_publications.csv`: included publications only
//! - `output_results.csv`: disposition without reasons (legacy shape kept
//!   for downstream spreadsheets)
//! - `results.json`: the same data plus the full counter snapshot and the
//!   per-database skip list

pub mod diagram;
pub mod summary;

use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::prisma::RunOutcome;

pub const ALL_PUBLICATIONS_CSV: &str = "all_publications_found.csv";
pub const SELECTED_PUBLICATIONS_CSV: &str = "selected_publications.csv";
pub const RESULTS_CSV: &str = "output_results.csv";
pub const RESULTS_JSON: &str = "results.json";

/// Report-writing failure.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize results JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct PublicationRow<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Journal")]
    journal: &'a str,
    #[serde(rename = "Included")]
    included: &'static str,
    #[serde(rename = "Reasons")]
    reasons: String,
}

fn rows(outcome: &RunOutcome) -> Vec<PublicationRow<'_>> {
    outcome
        .classified
        .iter()
        .map(|(publication, result)| PublicationRow {
            title: &publication.title,
            authors: publication.authors_joined(),
            year: publication.year.map(|y| y.to_string()).unwrap_or_default(),
            journal: publication.journal.as_deref().unwrap_or_default(),
            included: if result.is_included() { "Yes" } else { "No" },
            reasons: result.reasons_joined(),
        })
        .collect()
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> ReportError + '_ {
    move |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Write every report file into `output_dir`, creating it if needed.
///
/// Returns the written paths, in write order.
pub fn write_reports(
    outcome: &RunOutcome,
    output_dir: &Path,
    keywords: &[String],
) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = vec![
        write_all_publications_csv(outcome, output_dir)?,
        write_selected_csv(outcome, output_dir)?,
        write_results_csv(outcome, output_dir)?,
        write_json(outcome, output_dir)?,
    ];
    written.push(diagram::fill_drawio_template(outcome, output_dir, keywords)?);
    Ok(written)
}

/// `all_publications_found.csv`: disposition and reasons for every record.
pub fn write_all_publications_csv(
    outcome: &RunOutcome,
    output_dir: &Path,
) -> Result<PathBuf, ReportError> {
    let path = output_dir.join(ALL_PUBLICATIONS_CSV);
    let mut writer = csv::Writer::from_path(&path).map_err(csv_error(&path))?;
    for row in rows(outcome) {
        writer.serialize(row).map_err(csv_error(&path))?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// `selected_publications.csv`: included publications, no disposition
/// columns.
pub fn write_selected_csv(outcome: &RunOutcome, output_dir: &Path) -> Result<PathBuf, ReportError> {
    #[derive(Serialize)]
    struct SelectedRow<'a> {
        #[serde(rename = "Title")]
        title: &'a str,
        #[serde(rename = "Authors")]
        authors: String,
        #[serde(rename = "Year")]
        year: String,
        #[serde(rename = "Journal")]
        journal: &'a str,
    }

    let path = output_dir.join(SELECTED_PUBLICATIONS_CSV);
    let mut writer = csv::Writer::from_path(&path).map_err(csv_error(&path))?;
    for (publication, result) in &outcome.classified {
        if !result.is_included() {
            continue;
        }
        writer
            .serialize(SelectedRow {
                title: &publication.title,
                authors: publication.authors_joined(),
                year: publication.year.map(|y| y.to_string()).unwrap_or_default(),
                journal: publication.journal.as_deref().unwrap_or_default(),
            })
            .map_err(csv_error(&path))?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// `output_results.csv`: the legacy disposition-only listing.
pub fn write_results_csv(outcome: &RunOutcome, output_dir: &Path) -> Result<PathBuf, ReportError> {
    #[derive(Serialize)]
    struct LegacyRow<'a> {
        #[serde(rename = "Title")]
        title: &'a str,
        #[serde(rename = "Authors")]
        authors: String,
        #[serde(rename = "Year")]
        year: String,
        #[serde(rename = "Journal")]
        journal: &'a str,
        #[serde(rename = "Included")]
        included: &'static str,
    }

    let path = output_dir.join(RESULTS_CSV);
    let mut writer = csv::Writer::from_path(&path).map_err(csv_error(&path))?;
    for (publication, result) in &outcome.classified {
        writer
            .serialize(LegacyRow {
                title: &publication.title,
                authors: publication.authors_joined(),
                year: publication.year.map(|y| y.to_string()).unwrap_or_default(),
                journal: publication.journal.as_deref().unwrap_or_default(),
                included: if result.is_included() { "Yes" } else { "No" },
            })
            .map_err(csv_error(&path))?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// `results.json`: classified records, counters, and the skip list.
pub fn write_json(outcome: &RunOutcome, output_dir: &Path) -> Result<PathBuf, ReportError> {
    let results: Vec<_> = outcome
        .classified
        .iter()
        .map(|(publication, result)| {
            json!({
                "publication": publication,
                "disposition": result.disposition,
                "reasons": result.reasons.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            })
        })
        .collect();

    let skipped: Vec<_> = outcome
        .skipped
        .iter()
        .map(|(source, reason)| json!({"database": source.name(), "reason": reason}))
        .collect();

    let document = json!({
        "results": results,
        "criteria_counts": outcome.counts,
        "total_records": outcome.counts.total_identified,
        "skipped_databases": skipped,
    });

    let path = output_dir.join(RESULTS_JSON);
    let text = serde_json::to_string_pretty(&document)?;
    fs::write(&path, text).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
