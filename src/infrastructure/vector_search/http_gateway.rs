//! HTTP gateway to the vector search service

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::domain::{DomainError, Passage, VectorSearchGateway};
use crate::infrastructure::http_client::HttpClientTrait;

/// Gateway to the external vector search service, which embeds the query
/// and returns the closest wiki passages with their distances.
#[derive(Debug)]
pub struct HttpVectorSearch<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
    distance: f32,
}

impl<C: HttpClientTrait> HttpVectorSearch<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorSearchGateway for HttpVectorSearch<C> {
    async fn search(&self, query: &str, top_k: u32) -> Result<Vec<Passage>, DomainError> {
        let body = json!({"query": query, "top_k": top_k});

        let response = self
            .client
            .post_json(
                &self.search_url(),
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await
            .map_err(|e| DomainError::retrieval(e.to_string()))?;

        let parsed: SearchResponse = serde_json::from_value(response)
            .map_err(|e| DomainError::retrieval(format!("unexpected response shape: {e}")))?;

        debug!(results = parsed.results.len(), top_k, "Vector search completed");

        Ok(parsed
            .results
            .into_iter()
            .map(|r| Passage::new(r.title, r.content, r.url, r.distance))
            .collect())
    }
}
