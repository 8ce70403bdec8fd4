use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{NaiveDate, Utc};
use serde_json::json;

use vault_picks::{
    api::{create_router, AppState},
    config::Config,
    core::NumberRange,
    db::{ResultsQuery, Store},
    error::{AppError, AppResult},
    models::{
        NewWinningResult, RecommendationRecord, ResultsPage, SourceResult, Statistics,
        WinningResult,
    },
    services::{
        providers::{GenerateRequest, NumberSource},
        Recommender,
    },
};

/// AI source stub returning a canned result or a failure
struct StubSource {
    name: &'static str,
    reply: Option<SourceResult>,
}

impl StubSource {
    fn replying(name: &'static str, numbers: &[f64], analysis: &str, confidence: f64) -> Self {
        Self {
            name,
            reply: Some(SourceResult {
                numbers: numbers.to_vec(),
                analysis: analysis.to_string(),
                confidence,
            }),
        }
    }

    fn failing(name: &'static str) -> Self {
        Self { name, reply: None }
    }
}

#[async_trait]
impl NumberSource for StubSource {
    async fn generate(&self, _request: GenerateRequest) -> AppResult<SourceResult> {
        self.reply
            .clone()
            .ok_or_else(|| AppError::SourceUnavailable("backend down".to_string()))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// In-memory store standing in for Postgres + Redis
#[derive(Default)]
struct FakeStore {
    results: Mutex<Vec<WinningResult>>,
    saved_recommendations: Mutex<Vec<RecommendationRecord>>,
    fail_saves: bool,
}

impl FakeStore {
    fn seeded(results: Vec<WinningResult>) -> Self {
        Self {
            results: Mutex::new(results),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn fetch_statistics(&self) -> AppResult<Statistics> {
        let results = self.results.lock().unwrap();
        Ok(Statistics::from_results(&results))
    }

    async fn list_results(&self, query: ResultsQuery) -> AppResult<ResultsPage> {
        let results = self.results.lock().unwrap();
        let filtered: Vec<WinningResult> = results
            .iter()
            .filter(|r| query.start_date.map_or(true, |d| r.date >= d))
            .filter(|r| query.end_date.map_or(true, |d| r.date <= d))
            .cloned()
            .collect();

        let total = filtered.len() as i64;
        let offset = ((query.page - 1) * query.limit) as usize;
        let page_items: Vec<WinningResult> = filtered
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();

        Ok(ResultsPage {
            results: page_items,
            total,
            page: query.page,
            limit: query.limit,
            total_pages: (total + query.limit as i64 - 1) / query.limit as i64,
        })
    }

    async fn find_result_by_date(&self, date: NaiveDate) -> AppResult<Option<WinningResult>> {
        let results = self.results.lock().unwrap();
        Ok(results.iter().find(|r| r.date == date).cloned())
    }

    async fn insert_result(&self, new: NewWinningResult) -> AppResult<WinningResult> {
        let mut results = self.results.lock().unwrap();
        let inserted = WinningResult {
            id: results.len() as i64 + 1,
            date: new.date,
            winning_numbers: new.winning_numbers,
            total_participants: new.total_participants,
            created_at: Utc::now(),
        };
        results.insert(0, inserted.clone());
        Ok(inserted)
    }

    async fn save_recommendation(&self, record: &RecommendationRecord) -> AppResult<()> {
        if self.fail_saves {
            return Err(AppError::Internal("insert failed".to_string()));
        }
        self.saved_recommendations
            .lock()
            .unwrap()
            .push(record.clone());
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        redis_url: "redis://unused".to_string(),
        anthropic_api_key: "test".to_string(),
        anthropic_api_url: "http://unused.local".to_string(),
        anthropic_model: "claude-test".to_string(),
        openai_api_key: "test".to_string(),
        openai_api_url: "http://unused.local".to_string(),
        openai_model: "gpt-test".to_string(),
        admin_api_key: "admin-secret".to_string(),
        number_min: 10000,
        number_max: 99999,
        max_count: 10,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

fn winning_result(id: i64, date: &str, numbers: Vec<i32>) -> WinningResult {
    WinningResult {
        id,
        date: date.parse().unwrap(),
        winning_numbers: numbers,
        total_participants: Some(1000),
        created_at: Utc::now(),
    }
}

fn create_test_server(
    claude: StubSource,
    gpt: StubSource,
    store: Arc<FakeStore>,
) -> TestServer {
    let config = Arc::new(test_config());
    let range = NumberRange::new(config.number_min, config.number_max);
    let recommender = Arc::new(Recommender::new(Arc::new(claude), Arc::new(gpt), range));
    let state = AppState::new(config, store, recommender);
    TestServer::new(create_router(state)).unwrap()
}

fn default_server(store: Arc<FakeStore>) -> TestServer {
    create_test_server(
        StubSource::replying("Claude", &[10001.0, 10002.0, 10003.0], "claude picks", 0.9),
        StubSource::replying("GPT", &[10002.0, 10004.0], "gpt picks", 0.7),
        store,
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = default_server(Arc::new(FakeStore::default()));
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_recommend_single_source() {
    let store = Arc::new(FakeStore::default());
    let server = default_server(store.clone());

    let response = server
        .post("/api/recommend")
        .json(&json!({ "count": 3, "ai_model": "claude" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommended_numbers"], json!([10001, 10002, 10003]));
    assert_eq!(body["analysis"], "claude picks");
    assert_eq!(body["confidence"].as_f64().unwrap(), 0.9);
    assert_eq!(body["ai_model"], "claude");
    assert_eq!(body["strategy"], "balanced");

    // One audit record per successful call
    let saved = store.saved_recommendations.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].numbers, vec![10001, 10002, 10003]);
    assert_eq!(saved[0].count_requested, 3);
}

#[tokio::test]
async fn test_recommend_both_sources_merges() {
    let store = Arc::new(FakeStore::default());
    let server = default_server(store.clone());

    let response = server
        .post("/api/recommend")
        .json(&json!({ "count": 4, "ai_model": "both", "strategy": "safe" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommended_numbers"], json!([10001, 10002, 10003, 10004]));
    assert!((body["confidence"].as_f64().unwrap() - 0.8).abs() < 1e-12);
    assert_eq!(body["analysis"], "Claude: claude picks\n\nGPT: gpt picks");
    assert_eq!(body["ai_model"], "both");
    assert_eq!(body["strategy"], "safe");
}

#[tokio::test]
async fn test_recommend_fills_short_candidate_list() {
    let server = create_test_server(
        StubSource::replying("Claude", &[10001.0], "single pick", 0.5),
        StubSource::failing("GPT"),
        Arc::new(FakeStore::default()),
    );

    let response = server
        .post("/api/recommend")
        .json(&json!({ "count": 5, "ai_model": "claude" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let numbers: Vec<i64> = body["recommended_numbers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n.as_i64().unwrap())
        .collect();

    assert_eq!(numbers.len(), 5);
    assert_eq!(numbers[0], 10001);
    assert!(numbers.iter().all(|n| (10000..=99999).contains(n)));

    let unique: std::collections::HashSet<i64> = numbers.iter().copied().collect();
    assert_eq!(unique.len(), 5);
    assert_eq!(body["confidence"].as_f64().unwrap(), 0.5);
}

#[tokio::test]
async fn test_recommend_rejects_invalid_count() {
    let server = default_server(Arc::new(FakeStore::default()));

    for count in [0, 11] {
        let response = server
            .post("/api/recommend")
            .json(&json!({ "count": count, "ai_model": "claude" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_recommend_both_fails_when_one_source_down() {
    let store = Arc::new(FakeStore::default());
    let server = create_test_server(
        StubSource::replying("Claude", &[10001.0], "fine", 0.9),
        StubSource::failing("GPT"),
        store.clone(),
    );

    let response = server
        .post("/api/recommend")
        .json(&json!({ "count": 4, "ai_model": "both" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);

    // No partial recommendation gets recorded
    assert!(store.saved_recommendations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_does_not_fail_recommendation() {
    let store = Arc::new(FakeStore {
        fail_saves: true,
        ..Default::default()
    });
    let server = default_server(store);

    let response = server
        .post("/api/recommend")
        .json(&json!({ "count": 3, "ai_model": "claude" }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_statistics() {
    let store = Arc::new(FakeStore::seeded(vec![
        winning_result(2, "2026-08-22", vec![10000, 20000]),
        winning_result(1, "2026-08-15", vec![30000]),
    ]));
    let server = default_server(store);

    let response = server.get("/api/statistics").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["total_results"], 2);
    assert_eq!(body["average_winning_number"], 20000);
    assert_eq!(body["recent_winning_numbers"], json!([10000, 20000, 30000]));
}

#[tokio::test]
async fn test_results_pagination() {
    let store = Arc::new(FakeStore::seeded(vec![
        winning_result(3, "2026-08-22", vec![11111]),
        winning_result(2, "2026-08-15", vec![22222]),
        winning_result(1, "2026-08-08", vec![33333]),
    ]));
    let server = default_server(store);

    let response = server.get("/api/results?page=1&limit=2").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["date"], "2026-08-22");
}

#[tokio::test]
async fn test_results_rejects_oversized_limit() {
    let server = default_server(Arc::new(FakeStore::default()));
    let response = server.get("/api/results?limit=101").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_result_requires_admin_key() {
    let server = default_server(Arc::new(FakeStore::default()));

    let response = server
        .post("/api/results")
        .json(&json!({ "date": "2026-08-22", "winning_numbers": [12345] }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_result() {
    let store = Arc::new(FakeStore::default());
    let server = default_server(store);

    let response = server
        .post("/api/results")
        .add_header(
            axum::http::HeaderName::from_static("x-api-key"),
            axum::http::HeaderValue::from_static("admin-secret"),
        )
        .json(&json!({
            "date": "2026-08-22",
            "winning_numbers": [12345, 54321],
            "total_participants": 5000
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["winning_numbers"], json!([12345, 54321]));

    let response = server.get("/api/results").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_create_result_rejects_duplicate_date() {
    let store = Arc::new(FakeStore::seeded(vec![winning_result(
        1,
        "2026-08-22",
        vec![11111],
    )]));
    let server = default_server(store);

    let response = server
        .post("/api/results")
        .add_header(
            axum::http::HeaderName::from_static("x-api-key"),
            axum::http::HeaderValue::from_static("admin-secret"),
        )
        .json(&json!({ "date": "2026-08-22", "winning_numbers": [12345] }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_result_rejects_out_of_range_numbers() {
    let server = default_server(Arc::new(FakeStore::default()));

    let response = server
        .post("/api/results")
        .add_header(
            axum::http::HeaderName::from_static("x-api-key"),
            axum::http::HeaderValue::from_static("admin-secret"),
        )
        .json(&json!({ "date": "2026-08-22", "winning_numbers": [123] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
