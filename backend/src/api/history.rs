use crate::errors::{AppError, AppResult};
use crate::models::{HistoryReplayResponse, HistorySummary, ListResponse, MessageResponse};
use crate::AppState;
use log::info;
use rocket::serde::json::Json;
use rocket::{delete, get, State};

const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Placeholder ids a client sends when it only knows the query.
const QUERY_LOOKUP_IDS: [&str; 2] = ["undefined", "_"];

#[get("/history?<limit>")]
pub fn list_history(
    limit: Option<usize>,
    state: &State<AppState>,
) -> Json<ListResponse<HistorySummary>> {
    let entries = state.history.read_all();
    let data: Vec<HistorySummary> = entries
        .iter()
        .take(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .map(HistorySummary::from)
        .collect();

    Json(ListResponse {
        success: true,
        total: entries.len(),
        data,
    })
}

/// Replays a stored search. Never calls the upstream API.
#[get("/history/<id>?<query>")]
pub fn get_history(
    id: &str,
    query: Option<&str>,
    state: &State<AppState>,
) -> AppResult<Json<HistoryReplayResponse>> {
    let entry = if QUERY_LOOKUP_IDS.contains(&id) {
        query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .and_then(|q| state.history.find_by_query(q))
    } else {
        state.history.find_by_id(id)
    };

    let entry = entry.ok_or_else(|| {
        AppError::NotFound("Search history entry not found, please search again".to_string())
    })?;
    info!(
        "Replaying history {} (\"{}\", {} videos)",
        entry.id, entry.query, entry.result_count
    );

    Ok(Json(HistoryReplayResponse {
        success: true,
        total: entry.result_count,
        message: format!(
            "Loaded from history: {} videos matching the filter",
            entry.result_count
        ),
        data: entry.videos,
        query: entry.query,
        timestamp: entry.timestamp,
        from_history: true,
    }))
}

#[delete("/history")]
pub fn clear_history(state: &State<AppState>) -> AppResult<Json<MessageResponse>> {
    state.history.clear()?;
    Ok(Json(MessageResponse::ok("Search history cleared")))
}
