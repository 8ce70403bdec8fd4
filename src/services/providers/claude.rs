/// Anthropic Claude number source
///
/// Calls the Messages API and expects the model to answer with the JSON
/// payload described in the shared prompt. Anything else — HTTP failure,
/// empty content, unparseable text — surfaces as `SourceUnavailable`.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::SourceResult,
    services::providers::{parse_source_payload, recommendation_prompt, GenerateRequest, NumberSource},
};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;

#[derive(Clone)]
pub struct ClaudeSource {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl ClaudeSource {
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
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[async_trait::async_trait]
impl NumberSource for ClaudeSource {
    async fn generate(&self, request: GenerateRequest) -> AppResult<SourceResult> {
        let url = format!("{}/v1/messages", self.api_url);
        let prompt = recommendation_prompt(&request);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": self.model,
                "max_tokens": MAX_TOKENS,
                "messages": [
                    { "role": "user", "content": prompt }
                ]
            }))
            .send()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("Claude request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SourceUnavailable(format!(
                "Claude API returned status {}: {}",
                status, body
            )));
        }

        let messages: MessagesResponse = response.json().await.map_err(|e| {
            AppError::SourceUnavailable(format!("Failed to parse Claude response: {}", e))
        })?;

        let text = messages
            .content
            .iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text.as_deref())
            .ok_or_else(|| {
                AppError::SourceUnavailable("Claude response contained no text block".to_string())
            })?;

        let result = parse_source_payload(text)?;

        tracing::info!(
            candidates = result.numbers.len(),
            confidence = result.confidence,
            provider = "claude",
            "Recommendation generated"
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Claude"
    }
}
