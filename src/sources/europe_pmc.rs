//! Europe PMC client (serves the PubMed database entry).

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const EUROPE_PMC_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/search";

/// Europe PMC REST search.
///
/// Europe PMC aggregates MEDLINE/PubMed and PMC content, so it backs the
/// `PubMed` database without an API key.
#[derive(Debug, Clone)]
pub struct EuropePmcSource {
    client: HttpClient,
    base_url: String,
}

impl EuropePmcSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: EUROPE_PMC_URL.to_string(),
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

impl Default for EuropePmcSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for EuropePmcSource {
    fn id(&self) -> SourceId {
        SourceId::PubMed
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        let joined = query.joined_keywords(" AND ", " OR ");
        let page_size = query.page_size.to_string();

        let response = with_retry(api_retry_config(), || {
            let request = self.client.get(&self.base_url).query(&[
                ("query", joined.as_str()),
                ("format", "json"),
                ("pageSize", page_size.as_str()),
            ]);
            async move {
                let response = request.send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to search Europe PMC: {}", e))
                })?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::PubMed, response.status()));
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
            .pointer("/resultList/result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
