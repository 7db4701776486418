use crate::models::{HistoryEntry, VideoResult};
use crate::services::record_store::{push_front_bounded, RecordStore};
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{error, info};

const MAX_HISTORY_ENTRIES: usize = 100;

/// Completed searches, newest first. Replaying an entry never touches the upstream API.
pub struct HistoryStore {
    store: Box<dyn RecordStore<Vec<HistoryEntry>>>,
}

impl HistoryStore {
    pub fn new(store: Box<dyn RecordStore<Vec<HistoryEntry>>>) -> Self {
        Self { store }
    }

    pub fn read_all(&self) -> Vec<HistoryEntry> {
        match self.store.load() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                error!("Failed to read search history: {e:?}");
                Vec::new()
            }
        }
    }

    pub fn save(&self, query: &str, videos: &[VideoResult], max_results: u32) -> Result<HistoryEntry> {
        self.save_at(query, videos, max_results, Utc::now())
    }

    pub fn save_at(
        &self,
        query: &str,
        videos: &[VideoResult],
        max_results: u32,
        now: DateTime<Utc>,
    ) -> Result<HistoryEntry> {
        let mut entries = self.read_all();
        let entry = HistoryEntry {
            id: next_id(now, entries.first().map(|e| e.id.as_str())),
            query: query.to_string(),
            timestamp: now,
            result_count: videos.len(),
            max_results,
            videos: videos.to_vec(),
        };

        push_front_bounded(&mut entries, entry.clone(), MAX_HISTORY_ENTRIES);
        self.store.save(&entries)?;

        info!(
            "Saved search history: \"{query}\" - {} videos",
            entry.result_count
        );
        Ok(entry)
    }

    pub fn find_by_id(&self, id: &str) -> Option<HistoryEntry> {
        self.read_all().into_iter().find(|entry| entry.id == id)
    }

    /// Most recent entry whose query matches ignoring case.
    pub fn find_by_query(&self, query: &str) -> Option<HistoryEntry> {
        let wanted = query.to_lowercase();
        self.read_all()
            .into_iter()
            .find(|entry| entry.query.to_lowercase() == wanted)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        info!("Search history cleared");
        Ok(())
    }
}

/// Millisecond timestamp, bumped past the newest stored id so ids stay unique.
pub(crate) fn next_id(now: DateTime<Utc>, newest: Option<&str>) -> String {
    let mut id = now.timestamp_millis();
    if let Some(latest) = newest.and_then(|raw| raw.parse::<i64>().ok()) {
        if id <= latest {
            id = latest + 1;
        }
    }
    id.to_string()
}
