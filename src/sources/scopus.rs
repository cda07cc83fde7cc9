//! Scopus client.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const SCOPUS_API_URL: &str = "https://api.elsevier.com/content/search/scopus";

/// Scopus caps count at 200 per request
const SCOPUS_MAX_COUNT: usize = 200;

/// Scopus search. Requires an Elsevier API key.
#[derive(Debug, Clone)]
pub struct ScopusSource {
    client: HttpClient,
    base_url: String,
}

impl ScopusSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: SCOPUS_API_URL.to_string(),
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
        let clauses: Vec<String> = query
            .keywords
            .iter()
            .map(|keyword| format!("TITLE-ABS-KEY(\"{}\")", keyword))
            .collect();
        let mut text = match query.logic {
            crate::criteria::CombinationLogic::And => clauses.join(" AND "),
            crate::criteria::CombinationLogic::Or => clauses.join(" OR "),
        };
        if let Some(range) = query.year_range {
            // PUBYEAR comparisons are exclusive
            text.push_str(&format!(
                " AND PUBYEAR > {} AND PUBYEAR < {}",
                range.start - 1,
                range.end + 1
            ));
        }
        text
    }
}

impl Default for ScopusSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for ScopusSource {
    fn id(&self) -> SourceId {
        SourceId::Scopus
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        let api_key = query
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::InvalidRequest("Scopus requires an API key".to_string()))?;

        let text = Self::build_query(query);
        let count = query.page_size.min(SCOPUS_MAX_COUNT).to_string();

        let response = with_retry(api_retry_config(), || {
            let request = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("query", text.as_str()),
                    ("count", count.as_str()),
                    ("start", "0"),
                    ("sort", "pubyear"),
                ])
                .header("Accept", "application/json")
                .header("X-ELS-APIKey", api_key);
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search Scopus: {}", e)))?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::Scopus, response.status()));
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
            .pointer("/search-results/entry")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YearRange;
    use crate::criteria::CombinationLogic;

    #[test]
    fn test_build_query_year_comparisons_are_exclusive() {
        let query = SearchQuery::new(vec!["screening".to_string()])
            .logic(CombinationLogic::Or)
            .year_range(YearRange::new(2015, 2025).unwrap());
        assert_eq!(
            ScopusSource::build_query(&query),
            "TITLE-ABS-KEY(\"screening\") AND PUBYEAR > 2014 AND PUBYEAR < 2026"
        );
    }

    #[tokio::test]
    async fn test_search_without_key_is_invalid() {
        let source = ScopusSource::new();
        let err = source
            .search(&SearchQuery::new(vec!["x".to_string()]))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_search_parses_entries() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"search-results": {"entry": [
                    {"dc:title": "Indexed paper", "prism:publicationName": "Some Journal",
                     "prism:coverDate": "2021-06-01", "prism:aggregationType": "Journal"}
                ]}}"#,
            )
            .create_async()
            .await;

        let source = ScopusSource::with_base_url(server.url());
        let records = source
            .search(&SearchQuery::new(vec!["indexed".to_string()]).api_key("key"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["prism:aggregationType"], "Journal");
    }
}
