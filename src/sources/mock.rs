//! Mock database client for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{Source, SourceError};

/// A mock client that returns predefined raw records.
#[derive(Debug)]
pub struct MockSource {
    id: SourceId,
    requires_key: bool,
    records: Mutex<Vec<Value>>,
}

impl MockSource {
    /// Create a mock client posing as `id`, returning no records.
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            requires_key: false,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that insists on an API key, for skip-path tests.
    pub fn requiring_key(id: SourceId) -> Self {
        Self {
            id,
            requires_key: true,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Set the raw records returned by every search.
    pub fn set_records(&self, records: Vec<Value>) {
        let mut guard = self.records.lock().expect("mock records lock");
        *guard = records;
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn requires_api_key(&self) -> bool {
        self.requires_key
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        let guard = self.records.lock().expect("mock records lock");
        Ok(guard.clone())
    }
}
