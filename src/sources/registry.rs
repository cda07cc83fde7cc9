//! Registry for database clients.

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ArxivSource, CoreSource, CrossRefSource, DblpSource, EuropePmcSource, IeeeSource,
    ScopusSource, SemanticScholarSource, Source, SpringerSource,
};
use crate::models::SourceId;

/// Owns one client per supported database.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: HashMap<SourceId, Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create a registry with every supported database registered.
    pub fn new() -> Self {
        let mut registry = Self {
            sources: HashMap::new(),
        };

        registry.register(Arc::new(EuropePmcSource::new()));
        registry.register(Arc::new(CrossRefSource::new()));
        registry.register(Arc::new(ArxivSource::new()));
        registry.register(Arc::new(CoreSource::new()));
        registry.register(Arc::new(SemanticScholarSource::new()));
        registry.register(Arc::new(IeeeSource::new()));
        registry.register(Arc::new(SpringerSource::new()));
        registry.register(Arc::new(DblpSource::new()));
        registry.register(Arc::new(ScopusSource::new()));

        registry
    }

    /// Register a client, replacing any existing one for the same database
    /// (tests swap in mocks this way).
    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.sources.insert(source.id(), source);
    }

    /// Get the client for a database
    pub fn get(&self, id: SourceId) -> Option<&Arc<dyn Source>> {
        self.sources.get(&id)
    }

    /// All registered clients
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.values()
    }

    /// Number of registered clients
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;

    #[test]
    fn test_registry_covers_every_database() {
        let registry = SourceRegistry::new();
        assert_eq!(registry.len(), SourceId::ALL.len());
        for source in SourceId::ALL {
            let client = registry.get(source).expect("client registered");
            assert_eq!(client.id(), source);
        }
    }

    #[test]
    fn test_register_replaces_existing_client() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(MockSource::new(SourceId::PubMed)));
        assert_eq!(registry.len(), SourceId::ALL.len());
    }

    #[test]
    fn test_key_required_sources() {
        let registry = SourceRegistry::new();
        for source in [SourceId::Ieee, SourceId::Springer, SourceId::Scopus] {
            assert!(registry.get(source).unwrap().requires_api_key());
        }
        for source in [SourceId::PubMed, SourceId::Arxiv, SourceId::Core, SourceId::Dblp] {
            assert!(!registry.get(source).unwrap().requires_api_key());
        }
    }
}
