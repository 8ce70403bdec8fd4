use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{NewWinningResult, RecommendationRecord, ResultsPage, Statistics, WinningResult},
};

pub mod postgres;
pub mod redis;

pub use postgres::{create_pool, PgStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;

/// Filters for listing winning results
#[derive(Debug, Clone, Copy)]
pub struct ResultsQuery {
    pub page: u32,
    pub limit: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Persistence and statistics collaborator.
///
/// The recommendation flow only ever inserts; winning results are read for
/// statistics and listing, written by the admin upload endpoint. Abstracted
/// behind a trait so API tests can run against an in-memory fake.
#[async_trait]
pub trait Store: Send + Sync {
    /// Aggregate view over all stored winning results
    async fn fetch_statistics(&self) -> AppResult<Statistics>;

    /// Winning results, newest first, paginated and optionally date-filtered
    async fn list_results(&self, query: ResultsQuery) -> AppResult<ResultsPage>;

    /// Looks up the winning result for a specific draw date
    async fn find_result_by_date(&self, date: NaiveDate) -> AppResult<Option<WinningResult>>;

    /// Inserts a new winning result and returns the stored row
    async fn insert_result(&self, new: NewWinningResult) -> AppResult<WinningResult>;

    /// Persists a recommendation audit record
    async fn save_recommendation(&self, record: &RecommendationRecord) -> AppResult<()>;
}
