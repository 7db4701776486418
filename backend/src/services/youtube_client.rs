use crate::errors::{AppError, AppResult};
use crate::models::VideoResult;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// YouTube returns at most 50 search hits per page and accepts at most 50 ids per videos call.
pub const MAX_RESULTS_PER_CALL: usize = 50;

/// The two upstream operations the aggregator needs.
#[rocket::async_trait]
pub trait VideoApi: Send + Sync {
    /// One page of `search.list`, ordered by view count.
    async fn search_page(&self, query: &str, page_token: Option<&str>) -> AppResult<SearchPage>;

    /// `videos.list` with snippet and statistics for up to 50 ids.
    async fn video_details(&self, ids: &[String]) -> AppResult<Vec<VideoItem>>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

impl SearchPage {
    pub fn video_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| item.id.video_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: SearchItemId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSnippet {
    pub title: String,
    pub channel_title: String,
    pub published_at: String,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    pub fn best(&self) -> Option<&str> {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default,
        ]
        .into_iter()
        .flatten()
        .map(|thumb| thumb.url.as_str())
        .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
}

/// YouTube sends counters as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.parse().ok()).unwrap_or(0)
}

impl VideoItem {
    pub fn view_count(&self) -> u64 {
        parse_count(self.statistics.view_count.as_deref())
    }

    pub fn like_count(&self) -> u64 {
        parse_count(self.statistics.like_count.as_deref())
    }

    pub fn into_result(self) -> VideoResult {
        let view_count = self.view_count();
        let like_count = self.like_count();
        let thumbnail = self
            .snippet
            .thumbnails
            .best()
            .map(String::from)
            .unwrap_or_else(|| format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", self.id));

        VideoResult {
            video_url: format!("https://www.youtube.com/watch?v={}", self.id),
            id: self.id,
            title: self.snippet.title,
            channel_title: self.snippet.channel_title,
            view_count,
            like_count,
            published_at: self.snippet.published_at,
            thumbnail,
        }
    }
}

/// Maps a non-success upstream response onto the error taxonomy.
pub fn classify_upstream_error(status: u16, body: &str) -> AppError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("YouTube API responded with HTTP {status}")
            } else {
                trimmed.to_string()
            }
        });

    let lowered = message.to_lowercase();
    if status == 403 && (lowered.contains("quota") || lowered.contains("exceeded")) {
        return AppError::UpstreamQuotaExceeded(message);
    }

    AppError::Upstream {
        status: Some(status),
        message,
    }
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YouTubeClient {
    pub fn new(api_key: String, base_url: Url) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    fn endpoint(&self, name: &str) -> AppResult<Url> {
        // join() replaces the last segment unless the base ends with '/'
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(name)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid YouTube API URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.endpoint(endpoint)?;
        debug!("GET {url} {params:?}");

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                error!("YouTube API request to {endpoint} failed: {e:?}");
                AppError::Upstream {
                    status: None,
                    message: format!("Failed to reach YouTube API: {e}"),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("YouTube API {endpoint} returned {status}: {body}");
            return Err(classify_upstream_error(status.as_u16(), &body));
        }

        response.json::<T>().await.map_err(|e| AppError::Upstream {
            status: None,
            message: format!("Failed to parse YouTube API response: {e}"),
        })
    }
}

#[rocket::async_trait]
impl VideoApi for YouTubeClient {
    async fn search_page(&self, query: &str, page_token: Option<&str>) -> AppResult<SearchPage> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "video".to_string()),
            ("order", "viewCount".to_string()),
            ("maxResults", MAX_RESULTS_PER_CALL.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }
        self.get_json("search", &params).await
    }

    async fn video_details(&self, ids: &[String]) -> AppResult<Vec<VideoItem>> {
        #[derive(Deserialize)]
        struct VideoListResponse {
            #[serde(default)]
            items: Vec<VideoItem>,
        }

        let params = [
            ("part", "snippet,statistics".to_string()),
            ("id", ids.join(",")),
        ];
        let response: VideoListResponse = self.get_json("videos", &params).await?;
        Ok(response.items)
    }
}
