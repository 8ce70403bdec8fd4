use std::sync::Arc;

use crate::{
    core::{combine, merge, NumberRange},
    error::AppResult,
    models::{AiModel, Recommendation, Statistics, Strategy},
    services::providers::{GenerateRequest, NumberSource},
};

/// Orchestrates AI sources and the aggregation engine.
///
/// Fans out to one or both backends, merges their candidates into an
/// exact-size pick list, and combines confidences. Persistence and identifier
/// assignment happen upstream in the HTTP layer; this type only produces the
/// `Recommendation`.
pub struct Recommender {
    claude: Arc<dyn NumberSource>,
    gpt: Arc<dyn NumberSource>,
    range: NumberRange,
}

impl Recommender {
    pub fn new(claude: Arc<dyn NumberSource>, gpt: Arc<dyn NumberSource>, range: NumberRange) -> Self {
        Self { claude, gpt, range }
    }

    /// Produces a finalized recommendation for a validated request.
    ///
    /// In `both` mode the two backends run concurrently and either failure
    /// fails the whole request; a missing source is never papered over with
    /// the other source's output or with random numbers, since that would
    /// change what "both" means statistically.
    pub async fn recommend(
        &self,
        count: u32,
        ai_model: AiModel,
        strategy: Strategy,
        stats: Statistics,
    ) -> AppResult<Recommendation> {
        let request = GenerateRequest {
            count,
            strategy,
            stats,
        };

        match ai_model {
            AiModel::Claude => self.single(self.claude.as_ref(), AiModel::Claude, request).await,
            AiModel::Gpt => self.single(self.gpt.as_ref(), AiModel::Gpt, request).await,
            AiModel::Both => self.dual(request).await,
        }
    }

    async fn single(
        &self,
        source: &dyn NumberSource,
        tag: AiModel,
        request: GenerateRequest,
    ) -> AppResult<Recommendation> {
        let count = request.count as usize;

        let result = source.generate(request).await?;
        let numbers = merge(
            std::slice::from_ref(&result),
            count,
            self.range,
            &mut rand::thread_rng(),
        );

        Ok(Recommendation {
            numbers,
            analysis: result.analysis,
            confidence: result.confidence,
            ai_model: tag.as_str().to_string(),
        })
    }

    async fn dual(&self, request: GenerateRequest) -> AppResult<Recommendation> {
        let count = request.count as usize;

        let (claude_result, gpt_result) = tokio::try_join!(
            self.claude.generate(request.clone()),
            self.gpt.generate(request),
        )?;

        // Fixed merge order: Claude's candidates outrank GPT's on ties
        let sources = [claude_result, gpt_result];
        let numbers = merge(&sources, count, self.range, &mut rand::thread_rng());
        let confidence = combine(&[sources[0].confidence, sources[1].confidence]);

        // Both rationales survive verbatim, labeled per source
        let analysis = format!(
            "{}: {}\n\n{}: {}",
            self.claude.name(),
            sources[0].analysis,
            self.gpt.name(),
            sources[1].analysis,
        );

        Ok(Recommendation {
            numbers,
            analysis,
            confidence,
            ai_model: AiModel::Both.as_str().to_string(),
        })
    }
}
