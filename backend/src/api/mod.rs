pub mod frontend;
mod history;
mod logs;
mod search;
mod stats;

pub use frontend::*;
pub use history::*;
pub use logs::*;
pub use search::*;
pub use stats::*;

use crate::errors::AppError;
use crate::models::ErrorResponse;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, Request};

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Json<ErrorResponse> {
    Json(AppError::NotFound(format!("No route for {} {}", req.method(), req.uri())).to_response())
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request<'_>) -> Json<ErrorResponse> {
    let error = if status.code >= 500 {
        "internal_error"
    } else {
        "bad_request"
    };
    Json(ErrorResponse {
        success: false,
        error: error.to_string(),
        message: status.reason_lossy().to_string(),
        quota_exceeded: false,
    })
}

#[cfg(test)]
mod tests {
    use crate::models::{HistoryEntry, LogEntry, UsageRecord, VideoResult};
    use crate::services::history_service::HistoryStore;
    use crate::services::record_store::MemoryStore;
    use crate::services::request_log::RequestLog;
    use crate::services::search_service::tests::FakeVideoApi;
    use crate::services::usage_counter::UsageCounter;
    use crate::{build_rocket, AppState};
    use chrono::Local;
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;
    use serde_json::Value;

    struct Stores {
        usage: MemoryStore<UsageRecord>,
        history: MemoryStore<Vec<HistoryEntry>>,
        log: MemoryStore<Vec<LogEntry>>,
    }

    fn stores() -> Stores {
        Stores {
            usage: MemoryStore::new(),
            history: MemoryStore::new(),
            log: MemoryStore::new(),
        }
    }

    async fn client(api: FakeVideoApi, stores: &Stores, save_history: bool) -> Client {
        let state = AppState {
            youtube: Box::new(api),
            usage: UsageCounter::new(Box::new(stores.usage.clone())),
            history: HistoryStore::new(Box::new(stores.history.clone())),
            request_log: RequestLog::new(Box::new(stores.log.clone())),
            save_history,
        };
        Client::tracked(build_rocket(state, None))
            .await
            .expect("valid rocket instance")
    }

    async fn get_json(client: &Client, uri: &str) -> (Status, Value) {
        let response = client.get(uri).dispatch().await;
        let status = response.status();
        let body = response.into_json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    #[rocket::async_test]
    async fn search_returns_filtered_videos_and_saves_history() {
        let api = FakeVideoApi::paged(&[50], |n| if n < 30 { 150_000_000 } else { 1_000 });
        let stores = stores();
        let client = client(api, &stores, true).await;

        let (status, body) = get_json(&client, "/api/search?query=music").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["success"], true);
        assert_eq!(body["total"], 30);
        assert_eq!(body["data"].as_array().unwrap().len(), 30);
        assert_eq!(body["data"][0]["viewCount"], 150_000_000u64);
        assert_eq!(body["logInfo"]["rawCount"], 50);
        assert_eq!(body["logInfo"]["filteredCount"], 30);
        assert_eq!(body["logInfo"]["usedPagination"], false);

        let history = stores.history.get().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].query, "music");
        assert_eq!(history[0].result_count, 30);
        assert_eq!(history[0].max_results, 50);

        let log = stores.log.get().unwrap();
        assert_eq!(log[0].source, crate::models::SearchSource::Web);
    }

    #[rocket::async_test]
    async fn search_honours_query_parameters() {
        let api = FakeVideoApi::paged(&[50, 50, 50], |n| n as u64 * 10);
        let stores = stores();
        let client = client(api, &stores, true).await;

        let (status, body) =
            get_json(&client, "/api/search?query=x&maxResults=100&minViewCount=500").await;
        assert_eq!(status, Status::Ok);
        // ids v50..v99 reach 500..990 views
        assert_eq!(body["total"], 50);
        assert_eq!(body["logInfo"]["searchRequests"], 2);
        assert_eq!(body["logInfo"]["videoRequests"], 2);
        assert_eq!(body["logInfo"]["usedPagination"], true);
    }

    #[rocket::async_test]
    async fn serverless_mode_skips_history() {
        let stores = stores();
        let client = client(FakeVideoApi::paged(&[3], |_| 1), &stores, false).await;

        let (status, _) = get_json(&client, "/api/search?query=x&minViewCount=0").await;
        assert_eq!(status, Status::Ok);
        assert!(stores.history.get().is_none());
    }

    #[rocket::async_test]
    async fn zero_max_results_is_rejected() {
        let stores = stores();
        let client = client(FakeVideoApi::default(), &stores, true).await;

        let (status, body) = get_json(&client, "/api/search?query=x&maxResults=0").await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error"], "bad_request");
        assert!(stores.usage.get().is_none());
    }

    #[rocket::async_test]
    async fn exhausted_quota_is_reported_distinctly() {
        let stores = Stores {
            usage: MemoryStore::with_value(UsageRecord {
                total: 9_100,
                today: 9_100,
                today_date: Local::now().date_naive(),
                requests: Vec::new(),
            }),
            ..stores()
        };
        let api = FakeVideoApi::paged(&[50], |_| 1);
        let client = client(api, &stores, true).await;

        let (status, body) = get_json(&client, "/api/search?query=x").await;
        assert_eq!(status, Status::TooManyRequests);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "quota_exhausted");
        assert_eq!(body["quotaExceeded"], true);
        assert!(body["message"].as_str().unwrap().contains("9,100"));
        assert!(stores.history.get().is_none());
    }

    #[rocket::async_test]
    async fn stats_and_health() {
        let stores = stores();
        let client = client(FakeVideoApi::paged(&[2], |_| 1), &stores, true).await;
        get_json(&client, "/api/search?query=x").await;

        let (status, body) = get_json(&client, "/api/stats").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["stats"]["totalRequests"], 2);
        assert_eq!(body["stats"]["todayRequests"], 2);
        assert_eq!(body["stats"]["quotaInfo"]["dailyQuota"], 10_000);
        assert_eq!(body["stats"]["quotaInfo"]["remainingEstimate"], 9_998);
        assert_eq!(body["stats"]["recentRequests"][0]["endpoint"], "search");

        let (status, body) = get_json(&client, "/api/health").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["status"], "OK");
    }

    fn stored_video(id: &str) -> VideoResult {
        VideoResult {
            id: id.to_string(),
            title: id.to_uppercase(),
            channel_title: "Channel".to_string(),
            view_count: 200_000_000,
            like_count: 1,
            published_at: "2020-01-01T00:00:00Z".to_string(),
            thumbnail: String::new(),
            video_url: format!("https://www.youtube.com/watch?v={id}"),
        }
    }

    #[rocket::async_test]
    async fn history_replay_makes_no_upstream_call() {
        let stores = stores();
        let history = HistoryStore::new(Box::new(stores.history.clone()));
        let saved = history
            .save("Cats", &[stored_video("a"), stored_video("b")], 50)
            .unwrap();
        let client = client(FakeVideoApi::default(), &stores, true).await;

        let (status, body) = get_json(&client, &format!("/api/history/{}", saved.id)).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["fromHistory"], true);
        assert_eq!(body["total"], 2);
        assert_eq!(body["query"], "Cats");
        assert_eq!(body["data"][1]["id"], "b");

        let (status, body) = get_json(&client, "/api/history/undefined?query=cats").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"][0]["id"], "a");

        assert!(stores.usage.get().is_none());
        assert!(stores.log.get().is_none());
    }

    #[rocket::async_test]
    async fn missing_history_entry_is_not_found() {
        let stores = stores();
        let client = client(FakeVideoApi::default(), &stores, true).await;

        let (status, body) = get_json(&client, "/api/history/12345").await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["error"], "not_found");
        assert!(body.get("quotaExceeded").is_none());

        let (status, _) = get_json(&client, "/api/history/undefined").await;
        assert_eq!(status, Status::NotFound);
    }

    #[rocket::async_test]
    async fn history_list_omits_videos_and_clear_empties_it() {
        let stores = stores();
        let history = HistoryStore::new(Box::new(stores.history.clone()));
        for q in ["a", "b", "c"] {
            history.save(q, &[stored_video(q)], 50).unwrap();
        }
        let client = client(FakeVideoApi::default(), &stores, true).await;

        let (status, body) = get_json(&client, "/api/history?limit=2").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["total"], 3);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["query"], "c");
        assert!(data[0].get("videos").is_none());

        let response = client.delete("/api/history").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let (_, body) = get_json(&client, "/api/history").await;
        assert_eq!(body["total"], 0);
    }

    #[rocket::async_test]
    async fn logs_list_filter_statistics_and_clear() {
        let stores = stores();
        let client = client(FakeVideoApi::paged(&[1], |_| 1), &stores, true).await;
        get_json(&client, "/api/search?query=Funny%20Cats&minViewCount=0").await;
        // the fake has no pages left, so this one comes back empty
        get_json(&client, "/api/search?query=dogs&minViewCount=0").await;

        let (status, body) = get_json(&client, "/api/logs?query=CAT").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["search"]["query"], "Funny Cats");

        let (_, body) = get_json(&client, "/api/logs").await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["data"][0]["search"]["query"], "dogs");

        let (status, body) = get_json(&client, "/api/logs/statistics").await;
        assert_eq!(status, Status::Ok);
        let summary = &body["statistics"]["summary"];
        assert_eq!(summary["totalSearches"], 2);
        assert_eq!(summary["todaySearches"], 2);
        assert_eq!(summary["totalRawResults"], 1);
        assert_eq!(summary["filterRate"], "100.00%");

        let response = client.delete("/api/logs").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let (_, body) = get_json(&client, "/api/logs").await;
        assert_eq!(body["total"], 0);
    }

    #[rocket::async_test]
    async fn unknown_api_route_is_json_not_found() {
        let stores = stores();
        let client = client(FakeVideoApi::default(), &stores, true).await;

        let (status, body) = get_json(&client, "/api/nope").await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "not_found");
    }
}
