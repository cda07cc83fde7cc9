//! DBLP client.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const DBLP_API_URL: &str = "https://dblp.org/search/publ/api";

/// DBLP allows up to 1000 hits per request
const DBLP_MAX_HITS: usize = 1000;

/// DBLP publication search.
#[derive(Debug, Clone)]
pub struct DblpSource {
    client: HttpClient,
    base_url: String,
}

impl DblpSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: DBLP_API_URL.to_string(),
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

impl Default for DblpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for DblpSource {
    fn id(&self) -> SourceId {
        SourceId::Dblp
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        // DBLP treats whitespace as AND; `|` expresses OR
        let joined = match query.logic {
            crate::criteria::CombinationLogic::And => query.keywords.join(" "),
            crate::criteria::CombinationLogic::Or => query.keywords.join(" | "),
        };
        let hits = query.page_size.min(DBLP_MAX_HITS).to_string();

        let response = with_retry(api_retry_config(), || {
            let request = self.client.get(&self.base_url).query(&[
                ("q", joined.as_str()),
                ("h", hits.as_str()),
                ("format", "json"),
            ]);
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search DBLP: {}", e)))?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::Dblp, response.status()));
                }
                Ok(response)
            }
        })
        .await?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        // Each hit's `info` object is the record; the hit envelope itself
        // only carries scoring metadata
        let records = data
            .pointer("/result/hits/hit")
            .and_then(Value::as_array)
            .map(|hit_list| {
                hit_list
                    .iter()
                    .filter_map(|hit| hit.get("info").cloned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(records)
    }
}
