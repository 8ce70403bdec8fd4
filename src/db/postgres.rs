use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    cached,
    db::{Cache, CacheKey, ResultsQuery, Store},
    error::AppResult,
    models::{NewWinningResult, RecommendationRecord, ResultsPage, Statistics, WinningResult},
};

const STATISTICS_CACHE_TTL: u64 = 3600; // 1 hour

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed store with a Redis read-through cache for statistics
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    cache: Cache,
}

impl PgStore {
    pub fn new(pool: PgPool, cache: Cache) -> Self {
        Self { pool, cache }
    }

    /// Loads every winning result, newest first
    async fn fetch_all_results(&self) -> AppResult<Vec<WinningResult>> {
        let results = sqlx::query_as::<_, WinningResult>(
            r#"
            SELECT id, date, winning_numbers, total_participants, created_at
            FROM winning_results
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn fetch_statistics(&self) -> AppResult<Statistics> {
        cached!(
            self.cache,
            CacheKey::Statistics,
            STATISTICS_CACHE_TTL,
            async move {
                let results = self.fetch_all_results().await?;
                let stats = Statistics::from_results(&results);

                tracing::debug!(
                    total_results = stats.total_results,
                    "Statistics recomputed from winning results"
                );

                Ok::<_, crate::error::AppError>(stats)
            }
        )
    }

    async fn list_results(&self, query: ResultsQuery) -> AppResult<ResultsPage> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM winning_results
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .fetch_one(&self.pool)
        .await?;

        let offset = (query.page as i64 - 1) * query.limit as i64;
        let results = sqlx::query_as::<_, WinningResult>(
            r#"
            SELECT id, date, winning_numbers, total_participants, created_at
            FROM winning_results
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(query.limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(ResultsPage {
            results,
            total,
            page: query.page,
            limit: query.limit,
            total_pages: (total + query.limit as i64 - 1) / query.limit as i64,
        })
    }

    async fn find_result_by_date(&self, date: NaiveDate) -> AppResult<Option<WinningResult>> {
        let result = sqlx::query_as::<_, WinningResult>(
            r#"
            SELECT id, date, winning_numbers, total_participants, created_at
            FROM winning_results
            WHERE date = $1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn insert_result(&self, new: NewWinningResult) -> AppResult<WinningResult> {
        let inserted = sqlx::query_as::<_, WinningResult>(
            r#"
            INSERT INTO winning_results (date, winning_numbers, total_participants)
            VALUES ($1, $2, $3)
            RETURNING id, date, winning_numbers, total_participants, created_at
            "#,
        )
        .bind(new.date)
        .bind(&new.winning_numbers)
        .bind(new.total_participants)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(date = %inserted.date, numbers = inserted.winning_numbers.len(), "Winning result stored");

        Ok(inserted)
    }

    async fn save_recommendation(&self, record: &RecommendationRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recommendation_history
                (user_session_id, recommended_numbers, ai_model, strategy,
                 count_requested, analysis_reason, confidence_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.session_id)
        .bind(&record.numbers)
        .bind(&record.ai_model)
        .bind(&record.strategy)
        .bind(record.count_requested as i32)
        .bind(&record.analysis)
        .bind(record.confidence)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            session_id = %record.session_id,
            ai_model = %record.ai_model,
            "Recommendation saved"
        );

        Ok(())
    }
}
