use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
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

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogInfo {
    pub raw_count: usize,
    pub filtered_count: usize,
    pub search_requests: u32,
    pub video_requests: u32,
    pub used_pagination: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub data: Vec<VideoResult>,
    pub total: usize,
    pub message: String,
    pub log_info: Option<LogInfo>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: String,
    pub query: String,
    pub timestamp: String,
    pub result_count: usize,
    pub max_results: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReplayResponse {
    pub data: Vec<VideoResult>,
    pub total: usize,
    pub query: String,
    pub timestamp: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub total: usize,
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotaInfo {
    pub daily_quota: u64,
    pub remaining_estimate: u64,
    pub usage_percentage: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub total_requests: u64,
    pub today_requests: u64,
    pub quota_info: QuotaInfo,
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub stats: UsageSnapshot,
}

// Request log

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub date: String,
    pub time: String,
    pub search: LogSearch,
    pub api_requests: LogApiRequests,
    pub results: LogResults,
    pub result_details: LogResultDetails,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogSearch {
    pub query: String,
    pub max_results: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogApiRequests {
    pub search_requests: u32,
    pub video_requests: u32,
    pub total_requests: u32,
    pub used_pagination: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogResults {
    pub raw_count: usize,
    pub filtered_count: usize,
    pub filter_criteria: FilterCriteria,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub min_view_count: u64,
    pub description: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogResultDetails {
    pub has_results: bool,
    pub top_video: Option<TopVideo>,
    pub average_view_count: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopVideo {
    pub id: String,
    pub title: String,
    pub view_count: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
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

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct QueryCount {
    pub query: String,
    pub count: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogStatistics {
    pub summary: LogSummary,
    pub top_queries: Vec<QueryCount>,
}

#[derive(Debug, Deserialize)]
pub struct LogStatisticsResponse {
    pub statistics: LogStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default)]
    pub quota_exceeded: bool,
}
