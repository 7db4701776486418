//! Paginated search against the YouTube Data API.
//!
//! A single `search.list` call returns at most 50 hits, so larger requests walk
//! the continuation tokens, then fetch statistics for the collected ids in
//! batches of 50, keep the videos above the view threshold and rank them.
//! Every upstream call is recorded against the usage counter.

use crate::errors::{AppError, AppResult};
use crate::models::{SearchOutcome, SearchSource, TopVideo, VideoResult};
use crate::services::request_log::{LogInput, RequestLog};
use crate::services::usage_counter::UsageCounter;
use crate::services::youtube_client::{VideoApi, VideoItem, MAX_RESULTS_PER_CALL};
use log::{info, warn};
use serde_json::{json, Value};

/// Local refusal threshold: 90% of the 10,000 unit daily quota.
pub const QUOTA_SOFT_LIMIT: u64 = 9_000;
pub const DEFAULT_MAX_RESULTS: u32 = 50;
pub const DEFAULT_MIN_VIEW_COUNT: u64 = 100_000_000;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub min_view_count: u64,
    /// `None` skips the request log entirely.
    pub log: Option<LogContext>,
}

#[derive(Debug, Clone, Default)]
pub struct LogContext {
    pub source: SearchSource,
    pub history_id: Option<String>,
}

pub async fn search_videos(
    api: &dyn VideoApi,
    usage: &UsageCounter,
    request_log: &RequestLog,
    request: &SearchRequest,
) -> AppResult<SearchOutcome> {
    let today_calls = usage.today_calls();
    if today_calls >= QUOTA_SOFT_LIMIT {
        warn!("Refusing search \"{}\": {today_calls} units used today", request.query);
        return Err(AppError::QuotaExhausted { today_calls });
    }

    let wanted = request.max_results as usize;
    let call_budget = wanted.div_ceil(MAX_RESULTS_PER_CALL);

    let mut video_ids: Vec<String> = Vec::new();
    let mut page_tokens: Vec<String> = Vec::new();
    let mut next_page_token: Option<String> = None;
    let mut search_requests = 0u32;

    while (search_requests as usize) < call_budget {
        if let Some(token) = &next_page_token {
            page_tokens.push(token.clone());
        }

        let page = api
            .search_page(&request.query, next_page_token.as_deref())
            .await?;
        search_requests += 1;
        record_call(
            usage,
            "search",
            json!({
                "query": request.query,
                "maxResults": MAX_RESULTS_PER_CALL,
                "pageToken": next_page_token.as_deref().unwrap_or("first"),
            }),
        );

        video_ids.extend(page.video_ids().map(String::from));
        next_page_token = page.next_page_token;

        if video_ids.len() >= wanted || next_page_token.is_none() {
            break;
        }
    }

    video_ids.truncate(wanted);

    let mut outcome = SearchOutcome {
        raw_count: video_ids.len(),
        search_requests,
        used_pagination: !page_tokens.is_empty(),
        page_tokens_used: page_tokens,
        ..SearchOutcome::default()
    };

    if !video_ids.is_empty() {
        let mut items: Vec<VideoItem> = Vec::with_capacity(video_ids.len());
        for batch in video_ids.chunks(MAX_RESULTS_PER_CALL) {
            items.extend(api.video_details(batch).await?);
            outcome.video_requests += 1;
            record_call(usage, "videos", json!({ "videoCount": batch.len() }));
        }

        let videos = filter_and_rank(items, request.min_view_count);
        let (average_view_count, top_video) = summarize(&videos);
        outcome.filtered_count = videos.len();
        outcome.average_view_count = average_view_count;
        outcome.top_video = top_video;
        outcome.videos = videos;
    }

    if let Some(context) = &request.log {
        write_log_entry(request_log, request, &outcome, context);
    }

    info!(
        "Search \"{}\" finished: {} requested, {} fetched, {} kept",
        request.query, request.max_results, outcome.raw_count, outcome.filtered_count
    );
    Ok(outcome)
}

/// Keeps videos at or above the threshold, most viewed first.
/// The sort is stable, so equal view counts keep upstream order.
pub fn filter_and_rank(items: Vec<VideoItem>, min_view_count: u64) -> Vec<VideoResult> {
    let mut videos: Vec<VideoResult> = items
        .into_iter()
        .filter(|item| item.view_count() >= min_view_count)
        .map(VideoItem::into_result)
        .collect();
    videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    videos
}

/// Rounded mean view count and the most viewed video of an already ranked list.
pub fn summarize(videos: &[VideoResult]) -> (u64, Option<TopVideo>) {
    let top_video = videos.first().map(|video| TopVideo {
        id: video.id.clone(),
        title: video.title.clone(),
        view_count: video.view_count,
    });

    if videos.is_empty() {
        return (0, top_video);
    }
    let count = videos.len() as u128;
    let sum: u128 = videos.iter().map(|video| video.view_count as u128).sum();
    let average = (sum + count / 2) / count;
    (average as u64, top_video)
}

// Bookkeeping failures must not throw away quota that was already spent.
fn record_call(usage: &UsageCounter, endpoint: &str, params: Value) {
    if let Err(e) = usage.record_call(endpoint, params) {
        warn!("Failed to record {endpoint} call in usage stats: {e:?}");
    }
}

fn write_log_entry(
    request_log: &RequestLog,
    request: &SearchRequest,
    outcome: &SearchOutcome,
    context: &LogContext,
) {
    let input = LogInput {
        query: request.query.clone(),
        max_results: request.max_results,
        search_requests: outcome.search_requests,
        video_requests: outcome.video_requests,
        used_pagination: outcome.used_pagination,
        page_tokens: outcome.page_tokens_used.clone(),
        raw_count: outcome.raw_count,
        filtered_count: outcome.filtered_count,
        min_view_count: request.min_view_count,
        top_video: outcome.top_video.clone(),
        average_view_count: outcome.average_view_count,
        source: context.source,
        history_id: context.history_id.clone(),
    };
    if let Err(e) = request_log.append(input) {
        warn!("Failed to write request log entry: {e:?}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{LogEntry, UsageRecord};
    use crate::services::record_store::MemoryStore;
    use crate::services::youtube_client::{
        SearchItem, SearchItemId, SearchPage, VideoSnippet, VideoStatistics,
    };
    use chrono::Local;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Scripted upstream: search pages are served in order, details come
    /// from a view-count table keyed by id.
    #[derive(Default)]
    pub(crate) struct FakeVideoApi {
        pages: Mutex<VecDeque<SearchPage>>,
        views: HashMap<String, u64>,
        pub search_tokens: Mutex<Vec<Option<String>>>,
        pub detail_batches: Mutex<Vec<usize>>,
        fail_details_with: Option<u16>,
    }

    impl FakeVideoApi {
        pub(crate) fn new(pages: Vec<SearchPage>, views: HashMap<String, u64>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                views,
                ..Self::default()
            }
        }

        /// `counts` items per page with ids `v0, v1, ...`; every page but the
        /// last carries a continuation token.
        pub(crate) fn paged(counts: &[usize], view_of: impl Fn(usize) -> u64) -> Self {
            let mut pages = Vec::new();
            let mut views = HashMap::new();
            let mut next = 0;
            for (page_no, &count) in counts.iter().enumerate() {
                let items = (next..next + count)
                    .map(|n| {
                        views.insert(format!("v{n}"), view_of(n));
                        SearchItem {
                            id: SearchItemId {
                                video_id: Some(format!("v{n}")),
                            },
                        }
                    })
                    .collect();
                next += count;
                pages.push(SearchPage {
                    items,
                    next_page_token: (page_no + 1 < counts.len())
                        .then(|| format!("token-{}", page_no + 1)),
                });
            }
            Self::new(pages, views)
        }

        pub(crate) fn search_calls(&self) -> usize {
            self.search_tokens.lock().unwrap().len()
        }
    }

    #[rocket::async_trait]
    impl VideoApi for FakeVideoApi {
        async fn search_page(
            &self,
            _query: &str,
            page_token: Option<&str>,
        ) -> AppResult<SearchPage> {
            self.search_tokens
                .lock()
                .unwrap()
                .push(page_token.map(String::from));
            Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn video_details(&self, ids: &[String]) -> AppResult<Vec<VideoItem>> {
            self.detail_batches.lock().unwrap().push(ids.len());
            if let Some(status) = self.fail_details_with {
                return Err(crate::services::youtube_client::classify_upstream_error(
                    status,
                    r#"{"error":{"message":"You have exceeded your quota."}}"#,
                ));
            }
            Ok(ids
                .iter()
                .filter_map(|id| {
                    self.views.get(id).map(|views| VideoItem {
                        id: id.clone(),
                        snippet: VideoSnippet {
                            title: format!("Title {id}"),
                            channel_title: "Channel".to_string(),
                            published_at: "2020-01-01T00:00:00Z".to_string(),
                            ..VideoSnippet::default()
                        },
                        statistics: VideoStatistics {
                            view_count: Some(views.to_string()),
                            like_count: Some("10".to_string()),
                        },
                    })
                })
                .collect())
        }
    }

    struct Harness {
        usage: UsageCounter,
        usage_store: MemoryStore<UsageRecord>,
        log: RequestLog,
        log_store: MemoryStore<Vec<LogEntry>>,
    }

    fn harness() -> Harness {
        harness_with_usage(MemoryStore::new())
    }

    fn harness_with_usage(usage_store: MemoryStore<UsageRecord>) -> Harness {
        let log_store = MemoryStore::new();
        Harness {
            usage: UsageCounter::new(Box::new(usage_store.clone())),
            usage_store,
            log: RequestLog::new(Box::new(log_store.clone())),
            log_store,
        }
    }

    fn request(query: &str, max_results: u32, min_view_count: u64) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            max_results,
            min_view_count,
            log: Some(LogContext::default()),
        }
    }

    fn today_calls(h: &Harness) -> u64 {
        h.usage_store.get().map(|r| r.today).unwrap_or(0)
    }

    #[rocket::async_test]
    async fn single_page_filters_sorts_and_summarizes() {
        // first 30 fall from 2e8 in steps of 3e6, the rest sit below the threshold
        let views: Vec<u64> = (0..50)
            .map(|n| if n < 30 { 200_000_000 - n as u64 * 3_000_000 } else { 50_000_000 })
            .collect();
        let api = FakeVideoApi::paged(&[50], |n| views[n]);
        let h = harness();

        let outcome = search_videos(&api, &h.usage, &h.log, &request("test", 50, 100_000_000))
            .await
            .unwrap();

        assert_eq!(outcome.raw_count, 50);
        assert_eq!(outcome.filtered_count, 30);
        assert_eq!(outcome.videos.len(), 30);
        assert!(outcome
            .videos
            .windows(2)
            .all(|pair| pair[0].view_count >= pair[1].view_count));
        assert!(outcome.videos.iter().all(|v| v.view_count >= 100_000_000));

        let kept: u64 = views[..30].iter().sum();
        assert_eq!(outcome.average_view_count, (kept + 15) / 30);
        let top = outcome.top_video.unwrap();
        assert_eq!(top.view_count, 200_000_000);
        assert_eq!(top.id, "v0");

        assert_eq!(outcome.search_requests, 1);
        assert_eq!(outcome.video_requests, 1);
        assert!(!outcome.used_pagination);
        assert_eq!(today_calls(&h), 2);
    }

    #[rocket::async_test]
    async fn three_pages_for_one_hundred_twenty_results() {
        let api = FakeVideoApi::paged(&[50, 50, 20], |_| 150_000_000);
        let h = harness();

        let outcome = search_videos(&api, &h.usage, &h.log, &request("music", 120, 100_000_000))
            .await
            .unwrap();

        assert_eq!(outcome.search_requests, 3);
        assert!(outcome.used_pagination);
        assert_eq!(outcome.page_tokens_used, vec!["token-1", "token-2"]);
        assert_eq!(
            *api.search_tokens.lock().unwrap(),
            vec![None, Some("token-1".to_string()), Some("token-2".to_string())]
        );
        assert_eq!(outcome.raw_count, 120);
        assert_eq!(*api.detail_batches.lock().unwrap(), vec![50, 50, 20]);
        assert_eq!(outcome.video_requests, 3);
        assert_eq!(today_calls(&h), 6);
    }

    #[rocket::async_test]
    async fn call_budget_caps_search_calls_even_with_more_tokens() {
        // upstream would happily keep paging
        let api = FakeVideoApi::paged(&[50, 50, 50, 50, 50], |_| 1);
        let h = harness();

        let outcome = search_videos(&api, &h.usage, &h.log, &request("x", 60, 0))
            .await
            .unwrap();

        assert_eq!(api.search_calls(), 2);
        assert_eq!(outcome.search_requests, 2);
        assert_eq!(outcome.raw_count, 60);
        assert_eq!(*api.detail_batches.lock().unwrap(), vec![50, 10]);
    }

    #[rocket::async_test]
    async fn short_pages_stop_at_budget_without_reaching_the_target() {
        let api = FakeVideoApi::paged(&[10, 10, 10], |_| 1);
        let h = harness();

        let outcome = search_videos(&api, &h.usage, &h.log, &request("x", 100, 0))
            .await
            .unwrap();

        assert_eq!(api.search_calls(), 2);
        assert_eq!(outcome.raw_count, 20);
    }

    #[rocket::async_test]
    async fn missing_continuation_token_stops_paging() {
        let api = FakeVideoApi::paged(&[30], |_| 1);
        let h = harness();

        let outcome = search_videos(&api, &h.usage, &h.log, &request("x", 200, 0))
            .await
            .unwrap();

        assert_eq!(api.search_calls(), 1);
        assert_eq!(outcome.raw_count, 30);
        assert!(!outcome.used_pagination);
    }

    #[rocket::async_test]
    async fn empty_upstream_still_logs_zero_counts() {
        let api = FakeVideoApi::paged(&[0], |_| 0);
        let h = harness();

        let outcome = search_videos(&api, &h.usage, &h.log, &request("nothing", 50, 0))
            .await
            .unwrap();

        assert!(outcome.videos.is_empty());
        assert_eq!(outcome.raw_count, 0);
        assert_eq!(outcome.video_requests, 0);
        assert!(outcome.top_video.is_none());
        assert!(api.detail_batches.lock().unwrap().is_empty());

        let entries = h.log_store.get().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].search.query, "nothing");
        assert_eq!(entries[0].results.raw_count, 0);
        assert_eq!(entries[0].api_requests.search_requests, 1);
        assert!(!entries[0].result_details.has_results);
    }

    #[rocket::async_test]
    async fn soft_limit_refuses_before_any_call() {
        let usage_store = MemoryStore::with_value(UsageRecord {
            total: 9_000,
            today: 9_000,
            today_date: Local::now().date_naive(),
            requests: Vec::new(),
        });
        let h = harness_with_usage(usage_store);
        let api = FakeVideoApi::paged(&[50], |_| 1);

        let err = search_videos(&api, &h.usage, &h.log, &request("x", 50, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::QuotaExhausted { today_calls: 9_000 }));
        assert_eq!(err.category(), "quota_exhausted");
        assert_eq!(api.search_calls(), 0);
        assert_eq!(today_calls(&h), 9_000);
        assert!(h.log_store.get().is_none());
    }

    #[rocket::async_test]
    async fn yesterdays_usage_does_not_block_today() {
        let usage_store = MemoryStore::with_value(UsageRecord {
            total: 9_500,
            today: 9_500,
            today_date: Local::now().date_naive() - chrono::Duration::days(1),
            requests: Vec::new(),
        });
        let h = harness_with_usage(usage_store);
        let api = FakeVideoApi::paged(&[5], |_| 1);

        search_videos(&api, &h.usage, &h.log, &request("x", 50, 0))
            .await
            .unwrap();

        let record = h.usage_store.get().unwrap();
        assert_eq!(record.today, 2);
        assert_eq!(record.total, 9_502);
    }

    #[rocket::async_test]
    async fn upstream_quota_rejection_propagates_tagged() {
        let mut api = FakeVideoApi::paged(&[50], |_| 1);
        api.fail_details_with = Some(403);
        let h = harness();

        let err = search_videos(&api, &h.usage, &h.log, &request("x", 50, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamQuotaExceeded(_)));
        // the successful search call was still recorded
        assert_eq!(today_calls(&h), 1);
    }

    #[rocket::async_test]
    async fn logging_can_be_skipped() {
        let api = FakeVideoApi::paged(&[3], |_| 1);
        let h = harness();
        let mut req = request("quiet", 50, 0);
        req.log = None;

        search_videos(&api, &h.usage, &h.log, &req).await.unwrap();
        assert!(h.log_store.get().is_none());
    }

    #[rocket::async_test]
    async fn bookkeeping_write_failures_do_not_fail_the_search() {
        let api = FakeVideoApi::paged(&[3], |_| 5);
        let usage = UsageCounter::new(Box::new(MemoryStore::failing_writes()));
        let log = RequestLog::new(Box::new(MemoryStore::failing_writes()));

        let outcome = search_videos(&api, &usage, &log, &request("x", 50, 0))
            .await
            .unwrap();
        assert_eq!(outcome.filtered_count, 3);
    }

    #[test]
    fn equal_view_counts_keep_upstream_order() {
        let items = ["a", "b", "c", "d"]
            .iter()
            .zip([5u64, 9, 5, 9])
            .map(|(id, views)| VideoItem {
                id: id.to_string(),
                statistics: VideoStatistics {
                    view_count: Some(views.to_string()),
                    like_count: None,
                },
                ..VideoItem::default()
            })
            .collect();

        let ids: Vec<String> = filter_and_rank(items, 0)
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn summarize_rounds_and_handles_empty() {
        assert_eq!(summarize(&[]), (0, None));

        let videos: Vec<VideoResult> = [3u64, 2, 2]
            .iter()
            .enumerate()
            .map(|(n, &views)| {
                VideoItem {
                    id: format!("v{n}"),
                    statistics: VideoStatistics {
                        view_count: Some(views.to_string()),
                        like_count: None,
                    },
                    ..VideoItem::default()
                }
                .into_result()
            })
            .collect();
        let (average, top) = summarize(&videos);
        // 7 / 3 = 2.33 -> 2
        assert_eq!(average, 2);
        assert_eq!(top.unwrap().id, "v0");
    }
}
