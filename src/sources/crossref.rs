//! CrossRef client.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const CROSSREF_API_URL: &str = "https://api.crossref.org/works";

/// CrossRef REST API search.
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    client: HttpClient,
    base_url: String,
}

impl CrossRefSource {
    pub fn new() -> Self {
        // CrossRef asks polite clients to identify themselves
        let user_agent = format!(
            "{}/{} (https://github.com/prisma-search/prisma-search)",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        Self {
            client: HttpClient::with_user_agent(&user_agent),
            base_url: CROSSREF_API_URL.to_string(),
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

impl Default for CrossRefSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for CrossRefSource {
    fn id(&self) -> SourceId {
        SourceId::CrossRef
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        // CrossRef's free-text query treats whitespace as OR-ish relevance
        // matching; explicit boolean operators are not supported
        let joined = query.keywords.join(" ");
        let rows = query.page_size.to_string();

        let response = with_retry(api_retry_config(), || {
            let request = self
                .client
                .get(&self.base_url)
                .query(&[("query", joined.as_str()), ("rows", rows.as_str())]);
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search CrossRef: {}", e)))?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::CrossRef, response.status()));
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
            .pointer("/message/items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
