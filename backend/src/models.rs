use chrono::{DateTime, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub published_at: String,
    pub thumbnail: String,
    pub video_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVideo {
    pub id: String,
    pub title: String,
    pub view_count: u64,
}

/// Result of one aggregated search, before it is persisted to history.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub videos: Vec<VideoResult>,
    pub raw_count: usize,
    pub filtered_count: usize,
    pub search_requests: u32,
    pub video_requests: u32,
    pub used_pagination: bool,
    pub page_tokens_used: Vec<String>,
    pub average_view_count: u64,
    pub top_video: Option<TopVideo>,
}

impl SearchOutcome {
    pub fn log_info(&self) -> LogInfo {
        LogInfo {
            raw_count: self.raw_count,
            filtered_count: self.filtered_count,
            search_requests: self.search_requests,
            video_requests: self.video_requests,
            used_pagination: self.used_pagination,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInfo {
    pub raw_count: usize,
    pub filtered_count: usize,
    pub search_requests: u32,
    pub video_requests: u32,
    pub used_pagination: bool,
}

// Usage counter

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub total: u64,
    pub today: u64,
    pub today_date: NaiveDate,
    #[serde(default)]
    pub requests: Vec<ApiCallRecord>,
}

impl UsageRecord {
    pub fn new(today_date: NaiveDate) -> Self {
        Self {
            total: 0,
            today: 0,
            today_date,
            requests: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCallRecord {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub total_requests: u64,
    pub today_requests: u64,
    pub today_date: NaiveDate,
    pub recent_requests: Vec<ApiCallRecord>,
    pub quota_info: QuotaInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaInfo {
    pub note: String,
    pub daily_quota: u64,
    pub remaining_estimate: u64,
    pub usage_percentage: String,
}

// Search history

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub result_count: usize,
    pub max_results: u32,
    pub videos: Vec<VideoResult>,
}

/// History listing row; the video snapshot is only served by the detail route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub result_count: usize,
    pub max_results: u32,
}

impl From<&HistoryEntry> for HistorySummary {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            query: entry.query.clone(),
            timestamp: entry.timestamp,
            result_count: entry.result_count,
            max_results: entry.max_results,
        }
    }
}

// Request log

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    #[default]
    Web,
    History,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub date: String,
    pub time: String,
    pub search: LogSearch,
    pub api_requests: LogApiRequests,
    pub results: LogResults,
    pub result_details: LogResultDetails,
    #[serde(default)]
    pub source: SearchSource,
    pub history_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSearch {
    pub query: String,
    pub max_results: u32,
    pub requested_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogApiRequests {
    pub search_requests: u32,
    pub video_requests: u32,
    pub total_requests: u32,
    pub used_pagination: bool,
    pub page_tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResults {
    pub raw_count: usize,
    pub filtered_count: usize,
    pub filter_criteria: FilterCriteria,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub min_view_count: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResultDetails {
    pub has_results: bool,
    pub top_video: Option<TopVideo>,
    pub average_view_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStatistics {
    pub summary: LogSummary,
    pub top_queries: Vec<QueryCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    pub total_searches: usize,
    pub today_searches: usize,
    pub total_api_requests: u64,
    pub today_api_requests: u64,
    pub total_raw_results: u64,
    pub total_filtered_results: u64,
    pub pagination_used: usize,
    pub filter_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: usize,
}

// Response envelopes

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<VideoResult>,
    pub total: usize,
    pub message: String,
    pub log_info: LogInfo,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReplayResponse {
    pub success: bool,
    pub data: Vec<VideoResult>,
    pub total: usize,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub from_history: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub total: usize,
    pub data: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: UsageSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogStatisticsResponse {
    pub success: bool,
    pub statistics: LogStatistics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quota_exceeded: bool,
}
