use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which AI backend(s) a recommendation request wants consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiModel {
    Claude,
    Gpt,
    Both,
}

impl AiModel {
    /// Tag recorded with the recommendation (composite for merged output)
    pub fn as_str(&self) -> &'static str {
        match self {
            AiModel::Claude => "claude",
            AiModel::Gpt => "gpt",
            AiModel::Both => "both",
        }
    }
}

/// Recommendation style, passed through to the AI backends untouched.
///
/// The aggregation engine never interprets this; only the prompt builders in
/// the source providers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Safe,
    Aggressive,
    #[default]
    Balanced,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Safe => "safe",
            Strategy::Aggressive => "aggressive",
            Strategy::Balanced => "balanced",
        }
    }
}

/// One backend's raw output: candidate numbers, rationale, confidence.
///
/// Everything in here is untrusted. Models return numbers as arbitrary JSON
/// values, so candidates are carried as f64 until the merger validates them;
/// confidence is clamped to [0, 1] at the provider boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResult {
    pub numbers: Vec<f64>,
    pub analysis: String,
    pub confidence: f64,
}

/// Finalized recommendation returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub numbers: Vec<i32>,
    pub analysis: String,
    pub confidence: f64,
    pub ai_model: String,
}

/// Durable audit entry for one successful recommendation.
///
/// Built once per orchestration call and handed to the store; never updated.
#[derive(Debug, Clone)]
pub struct RecommendationRecord {
    pub session_id: String,
    pub numbers: Vec<i32>,
    pub ai_model: String,
    pub strategy: String,
    pub count_requested: u32,
    pub analysis: String,
    pub confidence: f64,
}

impl RecommendationRecord {
    /// Assigns a fresh session id and snapshots the request parameters
    pub fn new(recommendation: &Recommendation, strategy: Strategy, count_requested: u32) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            numbers: recommendation.numbers.clone(),
            ai_model: recommendation.ai_model.clone(),
            strategy: strategy.as_str().to_string(),
            count_requested,
            analysis: recommendation.analysis.clone(),
            confidence: recommendation.confidence,
        }
    }
}

/// One published draw of winning vault numbers
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WinningResult {
    pub id: i64,
    pub date: NaiveDate,
    pub winning_numbers: Vec<i32>,
    pub total_participants: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Admin-supplied winning result awaiting insertion
#[derive(Debug, Clone)]
pub struct NewWinningResult {
    pub date: NaiveDate,
    pub winning_numbers: Vec<i32>,
    pub total_participants: Option<i64>,
}

/// Aggregate view over past winning results.
///
/// Doubles as the stats context forwarded to the AI backends; the engine
/// treats it as an opaque, possibly stale snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_results: i64,
    pub average_winning_number: i64,
    pub recent_winning_numbers: Vec<i32>,
}

impl Statistics {
    /// How many recent draws feed the "recent numbers" window
    pub const RECENT_DRAWS: usize = 3;
    /// Cap on recent numbers handed to the AI backends
    pub const RECENT_NUMBERS_CAP: usize = 20;

    /// Summarizes winning results (expected newest first)
    pub fn from_results(results: &[WinningResult]) -> Self {
        let all_numbers: Vec<i32> = results
            .iter()
            .flat_map(|r| r.winning_numbers.iter().copied())
            .collect();

        let average = if all_numbers.is_empty() {
            0
        } else {
            let sum: i64 = all_numbers.iter().map(|&n| n as i64).sum();
            (sum as f64 / all_numbers.len() as f64).round() as i64
        };

        let recent_winning_numbers: Vec<i32> = results
            .iter()
            .take(Self::RECENT_DRAWS)
            .flat_map(|r| r.winning_numbers.iter().copied())
            .take(Self::RECENT_NUMBERS_CAP)
            .collect();

        Self {
            total_results: results.len() as i64,
            average_winning_number: average,
            recent_winning_numbers,
        }
    }
}

/// A page of winning results
#[derive(Debug, Clone, Serialize)]
pub struct ResultsPage {
    pub results: Vec<WinningResult>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(date: &str, numbers: Vec<i32>) -> WinningResult {
        WinningResult {
            id: 0,
            date: date.parse().unwrap(),
            winning_numbers: numbers,
            total_participants: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn statistics_over_empty_results() {
        let stats = Statistics::from_results(&[]);
        assert_eq!(stats.total_results, 0);
        assert_eq!(stats.average_winning_number, 0);
        assert!(stats.recent_winning_numbers.is_empty());
    }

    #[test]
    fn statistics_averages_all_numbers() {
        let results = vec![
            result("2026-08-22", vec![10000, 20000]),
            result("2026-08-15", vec![30000]),
        ];
        let stats = Statistics::from_results(&results);
        assert_eq!(stats.total_results, 2);
        assert_eq!(stats.average_winning_number, 20000);
    }

    #[test]
    fn recent_numbers_take_latest_three_draws() {
        let results = vec![
            result("2026-08-22", vec![11111]),
            result("2026-08-15", vec![22222]),
            result("2026-08-08", vec![33333]),
            result("2026-08-01", vec![44444]),
        ];
        let stats = Statistics::from_results(&results);
        assert_eq!(stats.recent_winning_numbers, vec![11111, 22222, 33333]);
    }

    #[test]
    fn recent_numbers_are_capped() {
        let many: Vec<i32> = (10000..10030).collect();
        let results = vec![result("2026-08-22", many)];
        let stats = Statistics::from_results(&results);
        assert_eq!(
            stats.recent_winning_numbers.len(),
            Statistics::RECENT_NUMBERS_CAP
        );
    }

    #[test]
    fn record_snapshots_request_parameters() {
        let recommendation = Recommendation {
            numbers: vec![10001, 10002],
            analysis: "steady picks".to_string(),
            confidence: 0.5,
            ai_model: "claude".to_string(),
        };
        let record = RecommendationRecord::new(&recommendation, Strategy::Safe, 2);

        assert_eq!(record.numbers, recommendation.numbers);
        assert_eq!(record.strategy, "safe");
        assert_eq!(record.count_requested, 2);
        assert!(!record.session_id.is_empty());
    }
}
