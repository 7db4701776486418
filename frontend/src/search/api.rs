use crate::env_variable_utils::api_url;
use crate::models::{
    ErrorResponse, HistoryReplayResponse, HistorySummary, ListResponse, SearchResponse,
    StatsResponse, UsageSnapshot,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use std::fmt;

/// A failed backend call, as far as the UI needs to distinguish it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
    pub quota_exceeded: bool,
}

impl ApiError {
    fn network(e: gloo_net::Error) -> Self {
        Self {
            status: None,
            message: format!("Network error: {e}"),
            quota_exceeded: false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if response.ok() {
        return response.json::<T>().await.map_err(|e| ApiError {
            status: Some(status),
            message: format!("Failed to parse response: {e}"),
            quota_exceeded: false,
        });
    }

    let text = response.text().await.unwrap_or_default();
    // Try to parse as structured error response first
    Err(match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(error_response) => ApiError {
            status: Some(status),
            message: error_response.message,
            quota_exceeded: error_response.quota_exceeded,
        },
        Err(_) => ApiError {
            status: Some(status),
            message: format!("Request failed ({status}): {text}"),
            quota_exceeded: false,
        },
    })
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = Request::get(url).send().await.map_err(ApiError::network)?;
    read_json(response).await
}

pub async fn search_videos(
    query: &str,
    max_results: u32,
    min_view_count: u64,
) -> Result<SearchResponse, ApiError> {
    let url = api_url(&format!(
        "/search?query={}&maxResults={}&minViewCount={}",
        urlencoding::encode(query),
        max_results,
        min_view_count
    ));
    get_json(&url).await
}

pub async fn fetch_stats() -> Result<UsageSnapshot, ApiError> {
    get_json::<StatsResponse>(&api_url("/stats"))
        .await
        .map(|response| response.stats)
}

pub async fn fetch_history(limit: usize) -> Result<Vec<HistorySummary>, ApiError> {
    get_json::<ListResponse<HistorySummary>>(&api_url(&format!("/history?limit={limit}")))
        .await
        .map(|response| response.data)
}

pub async fn replay_history(id: &str, query: &str) -> Result<HistoryReplayResponse, ApiError> {
    let url = api_url(&format!(
        "/history/{}?query={}",
        urlencoding::encode(id),
        urlencoding::encode(query)
    ));
    get_json(&url).await
}

pub async fn clear_history() -> Result<(), ApiError> {
    let response = Request::delete(&api_url("/history"))
        .send()
        .await
        .map_err(ApiError::network)?;
    read_json::<serde_json::Value>(response).await.map(|_| ())
}
