use crate::models::{
    FilterCriteria, LogApiRequests, LogEntry, LogResultDetails, LogResults, LogSearch,
    LogStatistics, LogSummary, QueryCount, SearchSource, TopVideo,
};
use crate::services::history_service::next_id;
use crate::services::record_store::{push_front_bounded, RecordStore};
use crate::utils::{describe_view_threshold, format_percentage};
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use log::{error, info};
use std::collections::HashMap;

const MAX_LOG_ENTRIES: usize = 500;
pub const DEFAULT_LOG_LIMIT: usize = 100;
const TOP_QUERY_COUNT: usize = 10;

/// Everything the aggregator knows about one search when it finishes.
#[derive(Debug, Clone, Default)]
pub struct LogInput {
    pub query: String,
    pub max_results: u32,
    pub search_requests: u32,
    pub video_requests: u32,
    pub used_pagination: bool,
    pub page_tokens: Vec<String>,
    pub raw_count: usize,
    pub filtered_count: usize,
    pub min_view_count: u64,
    pub top_video: Option<TopVideo>,
    pub average_view_count: u64,
    pub source: SearchSource,
    pub history_id: Option<String>,
}

pub struct RequestLog {
    store: Box<dyn RecordStore<Vec<LogEntry>>>,
}

impl RequestLog {
    pub fn new(store: Box<dyn RecordStore<Vec<LogEntry>>>) -> Self {
        Self { store }
    }

    pub fn append(&self, input: LogInput) -> Result<String> {
        self.append_at(input, Local::now())
    }

    pub fn append_at(&self, input: LogInput, now: DateTime<Local>) -> Result<String> {
        let mut entries = self.read_all();
        let id = next_id(
            now.with_timezone(&Utc),
            entries.first().map(|e| e.id.as_str()),
        );

        let entry = LogEntry {
            id: id.clone(),
            timestamp: now.with_timezone(&Utc),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            search: LogSearch {
                query: input.query.clone(),
                max_results: input.max_results,
                requested_results: input.max_results,
            },
            api_requests: LogApiRequests {
                search_requests: input.search_requests,
                video_requests: input.video_requests,
                total_requests: input.search_requests + input.video_requests,
                used_pagination: input.used_pagination,
                page_tokens: input.page_tokens,
            },
            results: LogResults {
                raw_count: input.raw_count,
                filtered_count: input.filtered_count,
                filter_criteria: FilterCriteria {
                    min_view_count: input.min_view_count,
                    description: describe_view_threshold(input.min_view_count),
                },
            },
            result_details: LogResultDetails {
                has_results: input.filtered_count > 0,
                top_video: input.top_video,
                average_view_count: input.average_view_count,
            },
            source: input.source,
            history_id: input.history_id,
        };

        push_front_bounded(&mut entries, entry, MAX_LOG_ENTRIES);
        self.store.save(&entries)?;

        info!(
            "[Search Log] \"{}\" - raw: {}, filtered: {}",
            input.query, input.raw_count, input.filtered_count
        );
        Ok(id)
    }

    pub fn read_all(&self) -> Vec<LogEntry> {
        match self.store.load() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                error!("Failed to read request log: {e:?}");
                Vec::new()
            }
        }
    }

    /// Newest first, optionally narrowed to queries containing `query` (any case).
    pub fn list(&self, limit: Option<usize>, query: Option<&str>) -> Vec<LogEntry> {
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.read_all()
            .into_iter()
            .filter(|entry| match &needle {
                Some(needle) => entry.search.query.to_lowercase().contains(needle),
                None => true,
            })
            .take(limit.unwrap_or(DEFAULT_LOG_LIMIT))
            .collect()
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        info!("Request log cleared");
        Ok(())
    }

    pub fn statistics(&self) -> LogStatistics {
        self.statistics_on(Local::now().date_naive())
    }

    pub fn statistics_on(&self, today: NaiveDate) -> LogStatistics {
        let entries = self.read_all();
        let is_today =
            |entry: &&LogEntry| entry.timestamp.with_timezone(&Local).date_naive() == today;

        let total_raw_results: u64 = entries.iter().map(|e| e.results.raw_count as u64).sum();
        let total_filtered_results: u64 = entries
            .iter()
            .map(|e| e.results.filtered_count as u64)
            .sum();

        LogStatistics {
            summary: LogSummary {
                total_searches: entries.len(),
                today_searches: entries.iter().filter(is_today).count(),
                total_api_requests: entries
                    .iter()
                    .map(|e| e.api_requests.total_requests as u64)
                    .sum(),
                today_api_requests: entries
                    .iter()
                    .filter(is_today)
                    .map(|e| e.api_requests.total_requests as u64)
                    .sum(),
                total_raw_results,
                total_filtered_results,
                pagination_used: entries
                    .iter()
                    .filter(|e| e.api_requests.used_pagination)
                    .count(),
                filter_rate: format_percentage(total_filtered_results, total_raw_results),
            },
            top_queries: top_queries(&entries, TOP_QUERY_COUNT),
        }
    }
}

/// Most frequent lower-cased queries; equal counts keep first-seen order.
pub fn top_queries(entries: &[LogEntry], limit: usize) -> Vec<QueryCount> {
    let mut counts: Vec<QueryCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let query = entry.search.query.to_lowercase();
        match positions.get(&query) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(query.clone(), counts.len());
                counts.push(QueryCount { query, count: 1 });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
