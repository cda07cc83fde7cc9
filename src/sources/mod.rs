//! Database clients with a trait-based architecture.
//!
//! This module defines the [`Source`] trait that all database clients
//! implement and the [`SourceRegistry`] that owns one client per supported
//! database. Clients return the provider's raw item objects untouched —
//! normalization into the canonical publication shape happens later, at
//! the screening boundary, so schema knowledge stays in one place
//! (`crate::normalize::fields`).
//!
//! # Implementing a New Database
//!
//! 1. Create a struct implementing [`Source`] (`id`, `search`, and
//!    `requires_api_key` when the provider demands a key)
//! 2. Register it in [`SourceRegistry::new`]
//! 3. Add its field table to `crate::normalize::fields`

mod arxiv;
mod core;
mod crossref;
mod dblp;
mod europe_pmc;
mod fetch;
mod ieee;
mod registry;
mod scopus;
mod semantic;
mod springer;

pub mod mock;

pub use arxiv::ArxivSource;
pub use core::CoreSource;
pub use crossref::CrossRefSource;
pub use dblp::DblpSource;
pub use europe_pmc::EuropePmcSource;
pub use fetch::fetch_all;
pub use ieee::IeeeSource;
pub use mock::MockSource;
pub use registry::SourceRegistry;
pub use scopus::ScopusSource;
pub use semantic::SemanticScholarSource;
pub use springer::SpringerSource;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};

/// Interface every database client implements.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Which database this client serves
    fn id(&self) -> SourceId;

    /// Whether the provider refuses unauthenticated requests entirely.
    ///
    /// Sources that merely rate-limit harder without a key (e.g. CORE)
    /// return false and warn instead.
    fn requires_api_key(&self) -> bool {
        false
    }

    /// Search for publications, returning the provider's raw item objects.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError>;
}

/// Errors that can occur when talking to a database
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (JSON, Atom, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// API error from the provider
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// Map an HTTP response status to a source error, treating 429 specially
/// so the retry layer can back off accordingly.
pub(crate) fn status_error(source: SourceId, status: reqwest::StatusCode) -> SourceError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        SourceError::RateLimit
    } else {
        SourceError::Api(format!("{} API returned status: {}", source.name(), status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_classification() {
        let err = status_error(SourceId::CrossRef, reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert!(matches!(err, SourceError::RateLimit));

        let err = status_error(SourceId::CrossRef, reqwest::StatusCode::BAD_GATEWAY);
        assert!(matches!(err, SourceError::Api(_)));
    }
}
