use crate::errors::{AppError, AppResult};
use crate::models::SearchResponse;
use crate::services::search_service::{
    self, LogContext, SearchRequest, DEFAULT_MAX_RESULTS, DEFAULT_MIN_VIEW_COUNT,
};
use crate::AppState;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, FromForm, State};

/// Query string of `/api/search`. Unparseable numbers fall back to the defaults.
#[derive(Debug, FromForm)]
pub struct SearchParams {
    query: Option<String>,
    #[field(name = "maxResults")]
    max_results: Option<u32>,
    #[field(name = "minViewCount")]
    min_view_count: Option<u64>,
}

#[get("/search?<params..>")]
pub async fn run_search(
    params: SearchParams,
    state: &State<AppState>,
) -> AppResult<Json<SearchResponse>> {
    let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if max_results == 0 {
        return Err(AppError::BadRequest(
            "maxResults must be at least 1".to_string(),
        ));
    }

    let request = SearchRequest {
        query: params.query.unwrap_or_default(),
        max_results,
        min_view_count: params.min_view_count.unwrap_or(DEFAULT_MIN_VIEW_COUNT),
        log: Some(LogContext::default()),
    };
    info!(
        "Search started: query=\"{}\", maxResults={}, minViewCount={}",
        request.query, request.max_results, request.min_view_count
    );

    let outcome = search_service::search_videos(
        state.youtube.as_ref(),
        &state.usage,
        &state.request_log,
        &request,
    )
    .await?;

    if state.save_history {
        state
            .history
            .save(&request.query, &outcome.videos, request.max_results)?;
    }

    let log_info = outcome.log_info();
    let total = outcome.videos.len();
    Ok(Json(SearchResponse {
        success: true,
        data: outcome.videos,
        total,
        message: format!("Found {total} videos matching the filter"),
        log_info,
    }))
}
