use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{endpoints, env, limits, models};
use crate::error::HiveError;
use crate::llm::{LlmClient, OpenAIClient};
use crate::search::{SearchClient, TavilySearch};

/// Every section and field is optional in the file; omitted values take
/// their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub dispatch: DispatchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    pub api_key_env: String,
    pub max_results: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DispatchSettings {
    /// Per-worker deadline in seconds. Unset means workers run to completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_timeout_secs: Option<u64>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: models::DEFAULT_CHAT_MODEL.to_string(),
            base_url: endpoints::DEEPSEEK_BASE_URL.to_string(),
            api_key_env: env::LLM_API_KEY.to_string(),
            max_tokens: limits::DEFAULT_MAX_TOKENS,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: endpoints::TAVILY_BASE_URL.to_string(),
            api_key_env: env::SEARCH_API_KEY.to_string(),
            max_results: limits::DEFAULT_SEARCH_RESULTS,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hive")
            .join("config.toml")
    }

    /// Load from the default path, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Ignoring {}: {e}", config_path.display()),
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, HiveError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| HiveError::Config(e.to_string()))
    }

    pub fn save(&self) -> Result<(), HiveError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), HiveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HiveError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the LLM API key from the environment variable named in settings.
    pub fn api_key(&self) -> Option<String> {
        read_key(&self.llm.api_key_env)
    }

    pub fn search_api_key(&self) -> Option<String> {
        read_key(&self.search.api_key_env)
    }

    pub fn worker_timeout(&self) -> Option<Duration> {
        self.dispatch.worker_timeout_secs.map(Duration::from_secs)
    }

    pub fn build_llm_client(&self) -> Result<Arc<dyn LlmClient>, HiveError> {
        let api_key = self.api_key().ok_or_else(|| missing_key(&self.llm.api_key_env))?;
        let client = OpenAIClient::new(api_key)
            .with_model(&self.llm.model)
            .with_base_url(&self.llm.base_url)
            .with_max_tokens(self.llm.max_tokens);
        Ok(Arc::new(client))
    }

    pub fn build_search_client(&self) -> Result<Arc<dyn SearchClient>, HiveError> {
        let api_key = self
            .search_api_key()
            .ok_or_else(|| missing_key(&self.search.api_key_env))?;
        let client = TavilySearch::new(api_key)?
            .with_base_url(&self.search.base_url)
            .with_max_results(self.search.max_results);
        Ok(Arc::new(client))
    }
}

fn read_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn missing_key(var: &str) -> HiveError {
    HiveError::Config(format!("environment variable {var} is not set"))
}
