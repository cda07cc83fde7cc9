//! Core data models for publications and search operations.

mod publication;
mod query;

pub use publication::{Publication, SourceId};
pub use query::SearchQuery;
