use crate::constants::{endpoints, limits};
use crate::error::HiveError;
use crate::search::{SearchClient, SearchHit};
use serde::{Deserialize, Serialize};

/// Tavily search API client.
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Result<Self, HiveError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(limits::SEARCH_TIMEOUT_SECS))
            .user_agent("hive/0.1")
            .build()
            .map_err(|e| HiveError::Search(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: endpoints::TAVILY_BASE_URL.to_string(),
            max_results: limits::DEFAULT_SEARCH_RESULTS,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[async_trait::async_trait]
impl SearchClient for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, HiveError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| HiveError::Search(format!("Search request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HiveError::Search(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(HiveError::Search(format!("Tavily error ({status}): {text}")));
        }

        let parsed: TavilyResponse = serde_json::from_str(&text)?;
        let mut hits = parsed.results;
        hits.truncate(self.max_results as usize);
        tracing::debug!(query, hits = hits.len(), "web search");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_tolerates_extra_fields() {
        let body = r#"{
            "query": "rust",
            "results": [
                {"title": "Rust", "url": "https://rust-lang.org", "content": "lang", "score": 0.9}
            ],
            "response_time": 1.2
        }"#;
        let parsed: TavilyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].title, "Rust");
    }

    #[test]
    fn test_default_max_results() {
        let search = TavilySearch::new("key").unwrap();
        assert_eq!(search.max_results(), 2);
        assert_eq!(search.with_max_results(5).max_results(), 5);
    }
}
