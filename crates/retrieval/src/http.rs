//! HTTP JSON adapter to the retriever sidecar.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use aqua_agent_config::RetrievalSettings;
use aqua_agent_core::{RetrievalError, RetrievedDocument, SimilarityRetriever};

/// HTTP-backed [`SimilarityRetriever`].
///
/// Request shape: `POST <endpoint>` with `{"query": "...", "top_k": N}`.
/// Response shape: `{"results": [{"content": "...", "metadata": {...}}]}`.
pub struct HttpRetriever {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RetrievedDocument>,
}

impl HttpRetriever {
    pub fn new(settings: &RetrievalSettings) -> Result<Self, RetrievalError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| RetrievalError::Request(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SimilarityRetriever for HttpRetriever {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, RetrievalError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&SearchRequest { query, top_k })
            .send()
            .await
            .map_err(|e| RetrievalError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Request(format!(
                "retriever returned status {status}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        tracing::debug!(results = parsed.results.len(), "retriever answered");
        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_with_metadata() {
        let raw = r#"{
            "results": [
                {
                    "content": "Product Name: Aquapure Home RO",
                    "metadata": {
                        "name": "Aquapure Home RO",
                        "price": 9500,
                        "category": "Domestic > RO Systems",
                        "image_url": "https://cdn.example.com/ro.jpg"
                    }
                },
                {"content": "bare document"}
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(
            parsed.results[0].metadata.name.as_deref(),
            Some("Aquapure Home RO")
        );
        assert_eq!(parsed.results[0].metadata.price, Some(9500));
        // Metadata is optional end to end.
        assert!(parsed.results[1].metadata.name.is_none());
    }

    #[test]
    fn test_empty_response_parses() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn test_request_serialization() {
        let request = SearchRequest {
            query: "vending machine",
            top_k: 15,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"query":"vending machine","top_k":15}"#);
    }
}
