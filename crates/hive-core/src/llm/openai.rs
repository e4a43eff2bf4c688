use crate::constants::{endpoints, models};
use crate::error::HiveError;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// Client for any OpenAI-compatible chat completions endpoint.
/// Defaults to DeepSeek, which speaks the same wire format.
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: Option<u32>,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: models::DEFAULT_CHAT_MODEL.to_string(),
            base_url: endpoints::DEEPSEEK_BASE_URL.to_string(),
            max_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, messages: &'a [Message]) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

fn parse_response(body: &str) -> Result<LlmResponse, HiveError> {
    let api_response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| HiveError::Llm(format!("Failed to parse response: {e}")))?;

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| HiveError::Llm("No response from API".into()))?;

    Ok(LlmResponse {
        message: Message::assistant(choice.message.content.unwrap_or_default()),
        usage: api_response.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

#[async_trait::async_trait]
impl LlmClient for OpenAIClient {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, HiveError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.build_request(messages))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(HiveError::Llm(format!(
                "API error ({}): {}",
                status, response_text
            )));
        }

        let parsed = parse_response(&response_text)?;
        if let Some(usage) = parsed.usage {
            tracing::debug!(
                model = %self.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "chat completion"
            );
        }
        Ok(parsed)
    }
}
