//! Terminal summary printed at the end of a run.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::path::Path;

use crate::output::diagram;
use crate::prisma::RunOutcome;
use crate::ui::{print_section, print_status, Status};

/// Print the PRISMA summary: counters, per-database table, exclusion
/// breakdown, flowchart, and Mermaid snippet.
pub fn print_summary(outcome: &RunOutcome, output_dir: &Path) {
    let counts = &outcome.counts;

    print_section("PRISMA Criteria Application Summary");
    println!("Identified: {}", counts.total_identified);
    println!("Screened:   {}", counts.total_screened);
    println!("Included:   {}", counts.total_included);
    println!("Excluded:   {}", counts.total_excluded);
    for (reason, count) in &counts.excluded_by_reason {
        println!("Excluded by '{}': {}", reason, count);
    }

    print_section("Per-Database Breakdown");
    println!("{}", source_table(outcome));

    for (source, reason) in &outcome.skipped {
        print_status(Status::Warning, &format!("{}: {}", source.name(), reason));
    }

    print_section("PRISMA Selection Flowchart");
    println!("{}", diagram::ascii_flowchart(counts));

    print_section("PRISMA Flow Diagram (Mermaid syntax, for research figure)");
    println!("{}", diagram::mermaid_snippet(counts));

    print_section("Output Files");
    println!(
        "Reports written to '{}': all publications, selected publications, \
         legacy results CSV, results.json, and the filled draw.io diagram.",
        output_dir.display()
    );
}

fn source_table(outcome: &RunOutcome) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Database", "Identified", "Included", "Excluded", "Status"]);

    for (name, source) in &outcome.counts.per_source {
        let status = source.skipped.clone().unwrap_or_else(|| "ok".to_string());
        table.add_row(vec![
            Cell::new(name),
            Cell::new(source.counts.identified),
            Cell::new(source.counts.included),
            Cell::new(source.counts.excluded),
            Cell::new(status),
        ]);
    }

    table
}
