use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::NumberRange,
    db::ResultsQuery,
    error::{AppError, AppResult},
    models::{AiModel, NewWinningResult, RecommendationRecord, ResultsPage, Statistics, Strategy, WinningResult},
};

use super::AppState;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// HTTP header carrying the admin shared secret
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub count: u32,
    pub ai_model: AiModel,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommended_numbers: Vec<i32>,
    pub analysis: String,
    pub confidence: f64,
    pub ai_model: String,
    pub strategy: String,
}

#[derive(Debug, Deserialize)]
pub struct ResultsQueryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateResultRequest {
    pub date: NaiveDate,
    pub winning_numbers: Vec<i32>,
    pub total_participants: Option<i64>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Generates a recommendation from the selected AI source(s) and records it
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    if request.count < 1 || request.count > state.config.max_count {
        return Err(AppError::InvalidRequest(format!(
            "count must be between 1 and {}",
            state.config.max_count
        )));
    }

    let stats = state.store.fetch_statistics().await?;

    let recommendation = state
        .recommender
        .recommend(request.count, request.ai_model, request.strategy, stats)
        .await?;

    // The recommendation is already final; a failed audit insert is logged,
    // not turned into a request failure.
    let record = RecommendationRecord::new(&recommendation, request.strategy, request.count);
    if let Err(e) = state.store.save_recommendation(&record).await {
        tracing::error!(error = %e, session_id = %record.session_id, "Failed to save recommendation history");
    }

    Ok(Json(RecommendResponse {
        recommended_numbers: recommendation.numbers,
        analysis: recommendation.analysis,
        confidence: recommendation.confidence,
        ai_model: recommendation.ai_model,
        strategy: request.strategy.as_str().to_string(),
    }))
}

/// Aggregate statistics over past winning results
pub async fn get_statistics(State(state): State<AppState>) -> AppResult<Json<Statistics>> {
    let stats = state.store.fetch_statistics().await?;
    Ok(Json(stats))
}

/// Paginated winning results, newest first
pub async fn get_results(
    State(state): State<AppState>,
    Query(params): Query<ResultsQueryParams>,
) -> AppResult<Json<ResultsPage>> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    if page < 1 {
        return Err(AppError::InvalidRequest("page must be positive".to_string()));
    }
    if limit < 1 || limit > MAX_LIMIT {
        return Err(AppError::InvalidRequest(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let results = state
        .store
        .list_results(ResultsQuery {
            page,
            limit,
            start_date: params.start_date,
            end_date: params.end_date,
        })
        .await?;

    Ok(Json(results))
}

/// Records a published winning result (admin only)
pub async fn create_result(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateResultRequest>,
) -> AppResult<(StatusCode, Json<WinningResult>)> {
    let api_key = headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok());
    if api_key != Some(state.config.admin_api_key.as_str()) {
        return Err(AppError::Unauthorized);
    }

    if request.winning_numbers.is_empty() {
        return Err(AppError::InvalidRequest(
            "winning_numbers must not be empty".to_string(),
        ));
    }

    let range = NumberRange::new(state.config.number_min, state.config.number_max);
    if let Some(invalid) = request
        .winning_numbers
        .iter()
        .find(|&&n| !range.is_valid(n as f64))
    {
        return Err(AppError::InvalidRequest(format!(
            "winning number {} is outside the range [{}, {}]",
            invalid, range.min, range.max
        )));
    }

    if request.date > Utc::now().date_naive() {
        return Err(AppError::InvalidRequest(
            "date must not be in the future".to_string(),
        ));
    }

    if state.store.find_result_by_date(request.date).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "result for {} already exists",
            request.date
        )));
    }

    let inserted = state
        .store
        .insert_result(NewWinningResult {
            date: request.date,
            winning_numbers: request.winning_numbers,
            total_participants: request.total_participants,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(inserted)))
}
