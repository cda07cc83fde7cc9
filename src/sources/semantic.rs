//! Semantic Scholar client.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const SEMANTIC_API_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// Fields requested for every paper object
const PAPER_FIELDS: &str = "title,year,authors,venue,abstract";

/// Semantic Scholar graph API search.
#[derive(Debug, Clone)]
pub struct SemanticScholarSource {
    client: HttpClient,
    base_url: String,
}

impl SemanticScholarSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: SEMANTIC_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (for testing)
    #[allow(dead_code)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for SemanticScholarSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for SemanticScholarSource {
    fn id(&self) -> SourceId {
        SourceId::SemanticScholar
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        // The relevance search endpoint has no boolean syntax; keywords
        // are submitted as one text query regardless of logic
        let joined = query.keywords.join(" ");
        let limit = query.page_size.to_string();
        let year = query.year_range.map(|range| range.to_string());

        let response = with_retry(api_retry_config(), || {
            let mut request = self.client.get(&self.base_url).query(&[
                ("query", joined.as_str()),
                ("limit", limit.as_str()),
                ("fields", PAPER_FIELDS),
            ]);
            if let Some(year) = &year {
                request = request.query(&[("year", year.as_str())]);
            }
            if let Some(key) = &query.api_key {
                request = request.header("x-api-key", key.as_str());
            }
            async move {
                let response = request.send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to search Semantic Scholar: {}", e))
                })?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::SemanticScholar, response.status()));
                }
                Ok(response)
            }
        })
        .await?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        Ok(data
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
