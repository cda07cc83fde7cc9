//! IEEE Xplore client.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const IEEE_API_URL: &str = "https://ieeexploreapi.ieee.org/api/v1/search/articles";

/// IEEE caps max_records at 200 per request
const IEEE_MAX_RECORDS: usize = 200;

/// IEEE Xplore metadata search. Requires an API key.
#[derive(Debug, Clone)]
pub struct IeeeSource {
    client: HttpClient,
    base_url: String,
}

impl IeeeSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: IEEE_API_URL.to_string(),
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

impl Default for IeeeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for IeeeSource {
    fn id(&self) -> SourceId {
        SourceId::Ieee
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        let api_key = query
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::InvalidRequest("IEEE requires an API key".to_string()))?;

        let quoted: Vec<String> = query
            .keywords
            .iter()
            .map(|keyword| format!("\"{}\"", keyword))
            .collect();
        let joined = match query.logic {
            crate::criteria::CombinationLogic::And => quoted.join(" AND "),
            crate::criteria::CombinationLogic::Or => quoted.join(" OR "),
        };
        let max_records = query.page_size.min(IEEE_MAX_RECORDS).to_string();

        let mut params = vec![
            ("querytext".to_string(), joined),
            ("max_records".to_string(), max_records),
            ("start_record".to_string(), "1".to_string()),
            ("apikey".to_string(), api_key.to_string()),
        ];
        if let Some(range) = query.year_range {
            params.push(("start_year".to_string(), range.start.to_string()));
            params.push(("end_year".to_string(), range.end.to_string()));
        }

        let response = with_retry(api_retry_config(), || {
            let request = self
                .client
                .get(&self.base_url)
                .query(&params)
                .header("Accept", "application/json");
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search IEEE: {}", e)))?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::Ieee, response.status()));
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
            .get("articles")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
