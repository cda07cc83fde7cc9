use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use prisma_search::config::load_config;
use prisma_search::criteria::{CombinationLogic, CriteriaSet};
use prisma_search::output::{summary::print_summary, write_reports};
use prisma_search::prisma::screen;
use prisma_search::sources::{fetch_all, SourceRegistry};
use prisma_search::ui::{self, print_status, Status};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// prisma-search - PRISMA systematic-review literature search and screening
#[derive(Parser, Debug)]
#[command(name = "prisma-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search academic databases and screen publications with PRISMA criteria", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "sample_input.json")]
    config: PathBuf,

    /// Keyword and criteria combination logic
    #[arg(long, value_enum, default_value_t = Logic::Or)]
    logic: Logic,

    /// Number of results requested per database
    #[arg(long = "page_size", default_value_t = 100)]
    page_size: usize,

    /// Directory to save output files
    #[arg(long = "output_dir", default_value = "output")]
    output_dir: PathBuf,

    /// Enable verbose logging (repeat for more: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,
}

/// Combination logic flag
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Logic {
    #[value(name = "AND", alias = "and")]
    And,
    #[value(name = "OR", alias = "or")]
    Or,
}

impl From<Logic> for CombinationLogic {
    fn from(logic: Logic) -> Self {
        match logic {
            Logic::And => CombinationLogic::And,
            Logic::Or => CombinationLogic::Or,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("prisma_search={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.page_size == 0 {
        anyhow::bail!("page size must be a positive integer");
    }

    // All configuration problems surface here, before any network traffic
    let plan = load_config(&cli.config)
        .with_context(|| format!("reading configuration '{}'", cli.config.display()))?
        .resolve()?;

    let logic = CombinationLogic::from(cli.logic);
    if !cli.quiet {
        if plan.keywords_expanded {
            print_status(
                Status::Warning,
                &format!(
                    "no keywords configured; derived from research topic: {}",
                    plan.keywords.join(", ")
                ),
            );
        } else {
            print_status(
                Status::Info,
                &format!("using configured keywords: {}", plan.keywords.join(", ")),
            );
        }
    }

    let criteria = CriteriaSet::from_raw(
        &plan.inclusion_criteria,
        &plan.exclusion_criteria,
        logic,
        Some(plan.year_range),
    );

    let registry = SourceRegistry::new();
    let show_progress = !cli.quiet && ui::is_terminal();
    let batches = fetch_all(&registry, &plan, logic, cli.page_size, show_progress).await;

    let outcome = screen(batches, &criteria);

    write_reports(&outcome, &cli.output_dir, &plan.keywords)
        .with_context(|| format!("writing reports to '{}'", cli.output_dir.display()))?;

    if !cli.quiet {
        print_summary(&outcome, &cli.output_dir);
    }

    Ok(())
}
