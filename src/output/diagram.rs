//! PRISMA flow diagram outputs: Mermaid text and a filled draw.io file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::output::ReportError;
use crate::prisma::{CriteriaCounts, RunOutcome};

/// File name for both the optional user template and the filled output
const TEMPLATE_NAME: &str = "prisma_flow_diagram.drawio";
const FILLED_NAME: &str = "prisma_flow_diagram_filled.drawio";

/// Default template shipped with the binary
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/prisma_flow_diagram.drawio");

/// Render the counters as a Mermaid `graph TD` snippet for papers.
pub fn mermaid_snippet(counts: &CriteriaCounts) -> String {
    let mut lines = vec![
        "graph TD".to_string(),
        format!(
            "    A[Records identified: {}] --> B[Records screened: {}]",
            counts.total_identified, counts.total_screened
        ),
        format!("    B --> C[Records excluded: {}]", counts.total_excluded),
    ];
    for (reason, count) in &counts.excluded_by_reason {
        let node = reason
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>();
        lines.push(format!("    C --> C_{}[{}: {}]", node, reason, count));
    }
    lines.push(format!(
        "    B --> D[Records included: {}]",
        counts.total_included
    ));
    lines.join("\n")
}

/// Render the counters as the ASCII flowchart printed in the summary.
pub fn ascii_flowchart(counts: &CriteriaCounts) -> String {
    let mut lines = vec![
        format!("Records identified: {}", counts.total_identified),
        "    |".to_string(),
        format!("    ├─ Records screened: {}", counts.total_screened),
        "    |     |".to_string(),
        format!("    |     ├─ Records excluded: {}", counts.total_excluded),
    ];
    for (reason, count) in &counts.excluded_by_reason {
        lines.push(format!("    |     |    └─ {}: {}", reason, count));
    }
    lines.push("    |     |".to_string());
    lines.push(format!(
        "    |     └─ Records included: {}",
        counts.total_included
    ));
    lines.join("\n")
}

/// Fill the draw.io PRISMA template and write it next to the other reports.
///
/// A `prisma_flow_diagram.drawio` template already present in the output
/// directory wins over the embedded default, so teams can keep their own
/// layout.
pub fn fill_drawio_template(
    outcome: &RunOutcome,
    output_dir: &Path,
    keywords: &[String],
) -> Result<PathBuf, ReportError> {
    let user_template = output_dir.join(TEMPLATE_NAME);
    let template = if user_template.exists() {
        fs::read_to_string(&user_template).map_err(|source| ReportError::Io {
            path: user_template.clone(),
            source,
        })?
    } else {
        DEFAULT_TEMPLATE.to_string()
    };

    let counts = &outcome.counts;
    let exclusion_counts = serde_json::to_string_pretty(&counts.excluded_by_reason)?;

    let filled = template
        .replace("{KEYWORDS}", &keywords.join(", "))
        .replace("{TOTAL_IDENTIFIED}", &counts.total_identified.to_string())
        .replace("{TOTAL_SCREENED}", &counts.total_screened.to_string())
        .replace("{TOTAL_INCLUDED}", &counts.total_included.to_string())
        .replace("{TOTAL_EXCLUDED}", &counts.total_excluded.to_string())
        .replace("{EXCLUSION_COUNTS}", &exclusion_counts);

    let path = output_dir.join(FILLED_NAME);
    fs::write(&path, filled).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CombinationLogic, CriteriaSet};
    use crate::models::SourceId;
    use crate::prisma::{screen, SourceBatch};
    use serde_json::json;

    fn outcome() -> RunOutcome {
        let criteria = CriteriaSet::from_raw(
            &[],
            &["language:non-english".to_string()],
            CombinationLogic::Or,
            None,
        );
        screen(
            vec![SourceBatch::records(
                SourceId::PubMed,
                vec![
                    json!({"title": "A", "language": "english"}),
                    json!({"title": "B", "language": "non-english"}),
                ],
            )],
            &criteria,
        )
    }

    #[test]
    fn test_mermaid_snippet_shape() {
        let outcome = outcome();
        let snippet = mermaid_snippet(&outcome.counts);
        assert!(snippet.starts_with("graph TD"));
        assert!(snippet.contains("Records identified: 2"));
        assert!(snippet.contains("Records excluded: 1"));
        assert!(snippet.contains("language:non-english: 1"));
        assert!(snippet.contains("Records included: 1"));
    }

    #[test]
    fn test_ascii_flowchart_lists_reasons() {
        let outcome = outcome();
        let chart = ascii_flowchart(&outcome.counts);
        assert!(chart.contains("└─ language:non-english: 1"));
    }

    #[test]
    fn test_fill_drawio_substitutes_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = outcome();
        let path =
            fill_drawio_template(&outcome, dir.path(), &["kw1".to_string(), "kw2".to_string()])
                .unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(!text.contains("{TOTAL_IDENTIFIED}"));
        assert!(text.contains("kw1, kw2"));
        assert!(text.contains("language:non-english"));
    }

    #[test]
    fn test_user_template_wins_over_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TEMPLATE_NAME),
            "custom {TOTAL_IDENTIFIED} template",
        )
        .unwrap();
        let outcome = outcome();
        let path = fill_drawio_template(&outcome, dir.path(), &[]).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "custom 2 template");
    }
}
