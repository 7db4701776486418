use crate::env_variable_utils::api_url;
use crate::models::{ListResponse, LogEntry, LogStatistics, LogStatisticsResponse};
use gloo_net::http::Request;

pub async fn fetch_logs(limit: usize, query: &str) -> Result<Vec<LogEntry>, String> {
    let mut url = api_url(&format!("/logs?limit={limit}"));
    if !query.trim().is_empty() {
        url.push_str(&format!("&query={}", urlencoding::encode(query.trim())));
    }

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        response
            .json::<ListResponse<LogEntry>>()
            .await
            .map(|list| list.data)
            .map_err(|e| format!("JSON parse error: {}", e))
    } else {
        Err(format!("HTTP error: {}", response.status()))
    }
}

pub async fn fetch_log_statistics() -> Result<LogStatistics, String> {
    let response = Request::get(&api_url("/logs/statistics"))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        response
            .json::<LogStatisticsResponse>()
            .await
            .map(|body| body.statistics)
            .map_err(|e| format!("JSON parse error: {}", e))
    } else {
        Err(format!("HTTP error: {}", response.status()))
    }
}

pub async fn clear_logs() -> Result<(), String> {
    let response = Request::delete(&api_url("/logs"))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        Ok(())
    } else {
        Err(format!("HTTP error: {}", response.status()))
    }
}
