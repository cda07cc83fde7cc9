//! Springer client.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const SPRINGER_API_URL: &str = "https://api.springernature.com/meta/v2/json";

/// Springer caps page size at 100 per request
const SPRINGER_MAX_RECORDS: usize = 100;

/// Springer Meta API search. Requires an API key.
#[derive(Debug, Clone)]
pub struct SpringerSource {
    client: HttpClient,
    base_url: String,
}

impl SpringerSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: SPRINGER_API_URL.to_string(),
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

    fn build_query(query: &SearchQuery) -> String {
        let quoted: Vec<String> = query
            .keywords
            .iter()
            .map(|keyword| format!("\"{}\"", keyword))
            .collect();
        let mut text = match query.logic {
            crate::criteria::CombinationLogic::And => quoted.join(" AND "),
            crate::criteria::CombinationLogic::Or => quoted.join(" OR "),
        };
        if let Some(range) = query.year_range {
            text.push_str(&format!(" year:{}-{}", range.start, range.end));
        }
        text
    }
}

impl Default for SpringerSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for SpringerSource {
    fn id(&self) -> SourceId {
        SourceId::Springer
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        let api_key = query.api_key.as_deref().ok_or_else(|| {
            SourceError::InvalidRequest("Springer requires an API key".to_string())
        })?;

        let text = Self::build_query(query);
        let page_size = query.page_size.min(SPRINGER_MAX_RECORDS).to_string();

        let response = with_retry(api_retry_config(), || {
            let request = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("q", text.as_str()),
                    ("s", page_size.as_str()),
                    ("p", "1"),
                    ("api_key", api_key),
                ])
                .header("Accept", "application/json");
            async move {
                let response = request.send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to search Springer: {}", e))
                })?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::Springer, response.status()));
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
            .get("records")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
