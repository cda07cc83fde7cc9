//! CORE client.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const CORE_API_URL: &str = "https://api.core.ac.uk/v3/search/works";

/// CORE v3 works search.
///
/// Works without an API key at a reduced rate limit, so a missing key is a
/// warning rather than a skip.
#[derive(Debug, Clone)]
pub struct CoreSource {
    client: HttpClient,
    base_url: String,
}

impl CoreSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: CORE_API_URL.to_string(),
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

    /// Build the CORE query string: per-keyword title clauses, the year
    /// window, and a full-text-exists guard.
    fn build_query(query: &SearchQuery) -> String {
        let clauses: Vec<String> = query
            .keywords
            .iter()
            .map(|keyword| format!("title:\"{}\"", keyword))
            .collect();
        let operator = match query.logic {
            crate::criteria::CombinationLogic::And => " AND ",
            crate::criteria::CombinationLogic::Or => " OR ",
        };
        let mut text = format!("({})", clauses.join(operator));
        if let Some(range) = query.year_range {
            text.push_str(&format!(
                " AND yearPublished>=\"{}\" AND yearPublished<=\"{}\"",
                range.start, range.end
            ));
        }
        text.push_str(" AND _exists_:fullText");
        text
    }
}

impl Default for CoreSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for CoreSource {
    fn id(&self) -> SourceId {
        SourceId::Core
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        if query.api_key.is_none() {
            tracing::warn!("CORE API key not provided; access may be limited");
        }

        let text = Self::build_query(query);
        let limit = query.page_size.to_string();

        let response = with_retry(api_retry_config(), || {
            let mut request = self
                .client
                .get(&self.base_url)
                .query(&[("q", text.as_str()), ("limit", limit.as_str())])
                .header("Accept", "application/json");
            if let Some(key) = &query.api_key {
                request = request.header("Authorization", key.as_str());
            }
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search CORE: {}", e)))?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::Core, response.status()));
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
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
