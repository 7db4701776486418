use crate::models::{HealthResponse, StatsResponse};
use crate::AppState;
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}

#[get("/stats")]
pub fn usage_stats(state: &State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        success: true,
        stats: state.usage.snapshot(),
    })
}
