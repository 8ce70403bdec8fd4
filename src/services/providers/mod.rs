/// AI number-source abstraction
///
/// Each backend (Anthropic Claude, OpenAI GPT) implements `NumberSource`:
/// given a requested count, a strategy label, and a statistics snapshot, it
/// returns candidate numbers with a rationale and a confidence score. Model
/// output is free-form text with no shape guarantee, so everything is parsed
/// strictly here and rejected before it can reach the aggregation engine.
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{SourceResult, Statistics, Strategy},
};

pub mod claude;
pub mod openai;

/// Inputs forwarded to an AI backend for one generation call
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub count: u32,
    pub strategy: Strategy,
    pub stats: Statistics,
}

/// A backend capable of proposing vault numbers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NumberSource: Send + Sync {
    /// Asks the backend for `request.count` candidate numbers.
    ///
    /// Fails with `SourceUnavailable` on any upstream problem: HTTP error,
    /// empty response, or a payload that does not parse into numbers,
    /// analysis, and confidence.
    async fn generate(&self, request: GenerateRequest) -> AppResult<SourceResult>;

    /// Display name used for rationale labels and logging
    fn name(&self) -> &'static str;
}

/// Builds the recommendation prompt shared by both backends.
///
/// Strategy wording lives here, not in the aggregation engine; the engine
/// treats the strategy as an opaque token.
pub fn recommendation_prompt(request: &GenerateRequest) -> String {
    let strategy_description = match request.strategy {
        Strategy::Safe => "Safe strategy: favor numbers near the historical average of winning numbers",
        Strategy::Aggressive => "Aggressive strategy: favor numbers that break from past winning patterns",
        Strategy::Balanced => "Balanced strategy: analyze past data and spread picks sensibly",
    };

    let recent = request
        .stats
        .recent_winning_numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are the number recommendation expert for the Gold Vault event.\n\n\
        Current situation:\n\
        - Requested picks: {count}\n\
        - Selected strategy: {strategy}\n\
        - Recent winning numbers: {recent}\n\
        - Total recorded results: {total}\n\
        - Average winning number: {average}\n\n\
        Recommend {count} numbers following the {label} strategy.\n\n\
        Respond with only a JSON object in this exact shape:\n\
        {{\n\
          \"recommendedNumbers\": [number, ...],\n\
          \"analysis\": \"reasoning behind the picks\",\n\
          \"confidence\": 0.0-1.0\n\
        }}\n\n\
        Numbers must be five digits, between 10000 and 99999.",
        count = request.count,
        strategy = strategy_description,
        recent = recent,
        total = request.stats.total_results,
        average = request.stats.average_winning_number,
        label = request.strategy.as_str(),
    )
}

/// JSON object both backends are instructed to return
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPayload {
    recommended_numbers: Vec<f64>,
    analysis: String,
    confidence: f64,
}

/// Parses a model's text reply into a `SourceResult`.
///
/// Models sometimes wrap the JSON object in prose or code fences, so on a
/// direct parse failure the substring between the outermost braces gets one
/// more attempt. Confidence is clamped to [0, 1]; the numbers stay raw for
/// the merger to validate.
pub(crate) fn parse_source_payload(text: &str) -> AppResult<SourceResult> {
    let payload = serde_json::from_str::<ModelPayload>(text.trim())
        .ok()
        .or_else(|| {
            let start = text.find('{')?;
            let end = text.rfind('}')?;
            serde_json::from_str::<ModelPayload>(&text[start..=end]).ok()
        })
        .ok_or_else(|| {
            AppError::SourceUnavailable("Model response is not a recommendation payload".to_string())
        })?;

    Ok(SourceResult {
        numbers: payload.recommended_numbers,
        analysis: payload.analysis,
        confidence: payload.confidence.clamp(0.0, 1.0),
    })
}
