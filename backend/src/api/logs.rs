use crate::errors::AppResult;
use crate::models::{ListResponse, LogEntry, LogStatisticsResponse, MessageResponse};
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{delete, get, State};

#[get("/logs?<limit>&<query>")]
pub fn list_logs(
    limit: Option<usize>,
    query: Option<&str>,
    state: &State<AppState>,
) -> Json<ListResponse<LogEntry>> {
    let data = state.request_log.list(limit, query);
    Json(ListResponse {
        success: true,
        total: data.len(),
        data,
    })
}

#[get("/logs/statistics")]
pub fn log_statistics(state: &State<AppState>) -> Json<LogStatisticsResponse> {
    Json(LogStatisticsResponse {
        success: true,
        statistics: state.request_log.statistics(),
    })
}

#[delete("/logs")]
pub fn clear_logs(state: &State<AppState>) -> AppResult<Json<MessageResponse>> {
    state.request_log.clear()?;
    Ok(Json(MessageResponse::ok("Request log cleared")))
}
