/// Anthropic Messages API provider
///
/// Sends the system instruction and the viewer profile as a single-turn
/// conversation and returns the text of the first content block.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::providers::RecommendationProvider,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::instrument;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct AnthropicProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Creates a provider, failing if no API key is configured
    pub fn new(api_key: String, api_url: String, model: String, max_tokens: u32) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("ANTHROPIC_API_KEY not set".to_string()));
        }

        Ok(Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.anthropic_api_key.clone(),
            config.anthropic_api_url.clone(),
            config.model.clone(),
            config.max_tokens,
        )
    }

    fn build_request<'a>(&'a self, system: &'a str, user: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        }
    }
}

/// Pulls the reply text out of a Messages API response body
fn extract_text(body: &str) -> AppResult<String> {
    let response: MessagesResponse = serde_json::from_str(body).map_err(|e| {
        AppError::ExternalApi(format!("Failed to parse Anthropic response: {}", e))
    })?;

    response
        .content
        .into_iter()
        .find_map(|block| block.text)
        .ok_or_else(|| AppError::ExternalApi("Empty response from Anthropic API".to_string()))
}

#[async_trait::async_trait]
impl RecommendationProvider for AnthropicProvider {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> AppResult<String> {
        let url = format!("{}/v1/messages", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request(system, user))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Anthropic API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        tracing::debug!(response = %body, "Raw Anthropic API response");

        let text = extract_text(&body)?;

        tracing::info!(
            provider = self.name(),
            chars = text.len(),
            "Completion received"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
