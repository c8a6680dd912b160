//! Wire data model shared by the job backend and the views.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of links the backend is asked to discover.
pub const DEFAULT_MAX_LINKS: u32 = 12;
/// Upper bound accepted for `max_links`.
pub const MAX_LINKS_LIMIT: u32 = 50;

/// Sub-metrics of one KPI category, in the order the backend declared them.
pub type KpiBlock = Map<String, Value>;

/// Parameters of one analysis job. Consumed by the start call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRequest {
    pub company: String,
    pub hints: String,
    pub max_links: u32,
}

impl JobRequest {
    /// Builds a request from raw form input.
    ///
    /// Returns `None` when the company is empty after trimming. `max_links`
    /// falls back to [`DEFAULT_MAX_LINKS`] when it does not parse as a positive
    /// integer and is capped at [`MAX_LINKS_LIMIT`].
    pub fn from_inputs(company: &str, hints: &str, max_links: &str) -> Option<Self> {
        let company = company.trim();
        if company.is_empty() {
            return None;
        }
        Some(Self {
            company: company.to_string(),
            hints: hints.trim().to_string(),
            max_links: parse_max_links(max_links),
        })
    }
}

fn parse_max_links(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_MAX_LINKS,
        Ok(n) => n.min(MAX_LINKS_LIMIT),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// Full state record returned by a status read. Always applied wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub status: JobStatus,
    /// Trusted verbatim; the client never clamps it.
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub items: Vec<SourceResult>,
    #[serde(default)]
    pub dashboard: Option<DashboardData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResult {
    pub url: String,
    pub ok: bool,
    #[serde(default)]
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub overall_sentiment_rate: Option<f64>,
    #[serde(default)]
    pub masters: HashMap<String, KpiBlock>,
    #[serde(default)]
    pub series: SentimentSeries,
    #[serde(default)]
    pub evidence: Option<Evidence>,
}

impl DashboardData {
    /// Overall rate used by cards and the gauge; a missing rate counts as 0.
    pub fn rate_or_zero(&self) -> f64 {
        self.overall_sentiment_rate.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSeries {
    #[serde(default)]
    pub sentiment_distribution: SentimentDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub neg: f64,
    #[serde(default)]
    pub neu: f64,
}

/// Most extreme sentences backing the score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default)]
    pub most_negative: Vec<ScoredSentence>,
    #[serde(default)]
    pub most_positive: Vec<ScoredSentence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentence {
    pub text: String,
    #[serde(default)]
    pub compound: f64,
}

/// One ranked, explained recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveAction {
    pub rank: i64,
    pub title: String,
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub expected_uplift_points: f64,
    #[serde(default)]
    pub time_horizon: String,
    #[serde(default)]
    pub kpis_impacted: Vec<String>,
}
