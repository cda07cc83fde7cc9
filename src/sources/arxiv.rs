//! arXiv client.

use async_trait::async_trait;
use feed_rs::parser;
use serde_json::{json, Value};

use crate::models::{SearchQuery, SourceId};
use crate::sources::{status_error, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv export API search.
///
/// The export API speaks Atom; entries are flattened into plain JSON
/// objects here so the normalizer sees the same record shape it gets from
/// every other database. The feed carries no venue, type, or language
/// attribute, so those stay absent.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: HttpClient,
    base_url: String,
}

impl ArxivSource {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: ARXIV_API_URL.to_string(),
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

    /// Flatten one Atom entry into a raw record object.
    fn entry_to_record(entry: &feed_rs::model::Entry) -> Value {
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.trim().to_string())
            .unwrap_or_default();

        let authors: Vec<String> = entry.authors.iter().map(|a| a.name.clone()).collect();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| s.content.trim().to_string())
            .unwrap_or_default();

        let mut record = json!({
            "id": entry.id.clone(),
            "title": title,
            "authors": authors,
            "summary": summary,
        });

        if let Some(published) = entry.published {
            record["published"] = json!(published.to_rfc3339());
        }

        record
    }
}

impl Default for ArxivSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> SourceId {
        SourceId::Arxiv
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        let encoded: Vec<String> = query
            .keywords
            .iter()
            .map(|keyword| urlencoding::encode(keyword).into_owned())
            .collect();
        let joined = match query.logic {
            crate::criteria::CombinationLogic::And => encoded.join("+AND+"),
            crate::criteria::CombinationLogic::Or => encoded.join("+OR+"),
        };
        let url = format!(
            "{}?search_query=all:{}&start=0&max_results={}",
            self.base_url, joined, query.page_size
        );

        let response = with_retry(api_retry_config(), || {
            let request = self.client.get(&url);
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search arXiv: {}", e)))?;
                if !response.status().is_success() {
                    return Err(status_error(SourceId::Arxiv, response.status()));
                }
                Ok(response)
            }
        })
        .await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read arXiv response: {}", e)))?;

        let feed = parser::parse(body.as_ref())
            .map_err(|e| SourceError::Parse(format!("Atom: {}", e)))?;

        Ok(feed.entries.iter().map(Self::entry_to_record).collect())
    }
}
