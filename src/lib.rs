//! # prisma-search
//!
//! PRISMA systematic-review literature search: query multiple academic
//! databases, normalize their records into one canonical publication
//! shape, screen publications against `field:value` inclusion/exclusion
//! criteria, and report PRISMA flow statistics.
//!
//! ## Architecture
//!
//! - [`models`]: canonical data structures ([`Publication`], [`models::SourceId`],
//!   [`models::SearchQuery`])
//! - [`sources`]: database clients with a trait-based architecture; raw
//!   records leave this layer untouched
//! - [`normalize`]: per-database field tables and the record normalizer —
//!   the only place that knows provider schemas
//! - [`criteria`]: criteria parsing and the classification algorithm
//! - [`prisma`]: the screening pipeline and PRISMA stage counters
//! - [`keywords`]: keyword derivation from a research topic
//! - [`config`]: configuration loading and validation
//! - [`output`]: CSV/JSON reports, flow diagrams, terminal summary
//! - [`utils`]: HTTP client and retry plumbing
//! - [`ui`]: terminal formatting helpers

pub mod config;
pub mod criteria;
pub mod keywords;
pub mod models;
pub mod normalize;
pub mod output;
pub mod prisma;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use criteria::{classify, ClassificationResult, CriteriaSet};
pub use models::Publication;
pub use prisma::{screen, CriteriaCounts, PrismaAggregator};
pub use sources::{Source, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
