/// OpenAI GPT number source
///
/// Calls the Chat Completions API with a system message pinning the JSON-only
/// response format. Upstream failures map to `SourceUnavailable`, same as the
/// Claude source.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::SourceResult,
    services::providers::{parse_source_payload, recommendation_prompt, GenerateRequest, NumberSource},
};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.7;

#[derive(Clone)]
pub struct OpenAiSource {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiSource {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl NumberSource for OpenAiSource {
    async fn generate(&self, request: GenerateRequest) -> AppResult<SourceResult> {
        let url = format!("{}/v1/chat/completions", self.api_url);
        let prompt = recommendation_prompt(&request);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": "You are the number recommendation expert for the Gold Vault event. Respond with JSON only."
                    },
                    { "role": "user", "content": prompt }
                ],
                "max_tokens": MAX_TOKENS,
                "temperature": TEMPERATURE
            }))
            .send()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("GPT request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SourceUnavailable(format!(
                "OpenAI API returned status {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            AppError::SourceUnavailable(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let text = chat
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| AppError::SourceUnavailable("Empty response from GPT".to_string()))?;

        let result = parse_source_payload(text)?;

        tracing::info!(
            candidates = result.numbers.len(),
            confidence = result.confidence,
            provider = "gpt",
            "Recommendation generated"
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "GPT"
    }
}
