mod tavily;

pub use tavily::TavilySearch;

use crate::constants::messages;
use crate::error::HiveError;
use serde::{Deserialize, Serialize};

/// A single web search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Web search capability injected into research workers.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, HiveError>;
}

/// Render hits as a numbered list suitable for embedding in a prompt.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return messages::NO_SEARCH_RESULTS.to_string();
    }

    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {} ({})\n   {}", i + 1, hit.title, hit.url, hit.content.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
