use crate::models::{ApiCallRecord, QuotaInfo, UsageRecord, UsageSnapshot};
use crate::services::record_store::{push_back_bounded, RecordStore};
use crate::utils::{format_percentage, format_with_separators};
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use log::{error, info, warn};
use serde_json::Value;

/// Free YouTube Data API allowance per day, in quota units.
pub const DAILY_QUOTA: u64 = 10_000;
const MAX_RECENT_CALLS: usize = 100;
const SNAPSHOT_RECENT_CALLS: usize = 20;

/// Resets the daily counter when the record belongs to an earlier day.
pub fn rollover_if_needed(mut record: UsageRecord, today: NaiveDate) -> UsageRecord {
    if record.today_date != today {
        record.today = 0;
        record.today_date = today;
    }
    record
}

pub struct UsageCounter {
    store: Box<dyn RecordStore<UsageRecord>>,
}

impl UsageCounter {
    pub fn new(store: Box<dyn RecordStore<UsageRecord>>) -> Self {
        Self { store }
    }

    pub fn record_call(&self, endpoint: &str, params: Value) -> Result<UsageRecord> {
        self.record_call_at(endpoint, params, Local::now())
    }

    pub fn record_call_at(
        &self,
        endpoint: &str,
        params: Value,
        now: DateTime<Local>,
    ) -> Result<UsageRecord> {
        let mut record = rollover_if_needed(self.read_record(now.date_naive()), now.date_naive());
        record.total += 1;
        record.today += 1;
        push_back_bounded(
            &mut record.requests,
            ApiCallRecord {
                timestamp: now.with_timezone(&Utc),
                endpoint: endpoint.to_string(),
                params,
            },
            MAX_RECENT_CALLS,
        );
        self.store.save(&record)?;

        info!(
            "[API Request] {endpoint} - total: {}, today: {}",
            record.total, record.today
        );
        Ok(record)
    }

    pub fn today_calls(&self) -> u64 {
        self.current_record(Local::now().date_naive()).today
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        self.snapshot_on(Local::now().date_naive())
    }

    pub fn snapshot_on(&self, today: NaiveDate) -> UsageSnapshot {
        let record = self.current_record(today);
        let recent_start = record.requests.len().saturating_sub(SNAPSHOT_RECENT_CALLS);

        UsageSnapshot {
            total_requests: record.total,
            today_requests: record.today,
            today_date: record.today_date,
            recent_requests: record.requests[recent_start..].to_vec(),
            quota_info: QuotaInfo {
                note: format!(
                    "YouTube Data API free quota: {} units per day",
                    format_with_separators(DAILY_QUOTA)
                ),
                daily_quota: DAILY_QUOTA,
                remaining_estimate: DAILY_QUOTA.saturating_sub(record.today),
                usage_percentage: format_percentage(record.today, DAILY_QUOTA),
            },
        }
    }

    /// Read path: rolls the day over and persists that, best-effort.
    fn current_record(&self, today: NaiveDate) -> UsageRecord {
        let stored = self.read_record(today);
        if stored.today_date == today {
            return stored;
        }
        let record = rollover_if_needed(stored, today);
        if let Err(e) = self.store.save(&record) {
            warn!("Failed to persist daily usage rollover: {e:?}");
        }
        record
    }

    fn read_record(&self, today: NaiveDate) -> UsageRecord {
        match self.store.load() {
            Ok(Some(record)) => record,
            Ok(None) => UsageRecord::new(today),
            Err(e) => {
                error!("Failed to read API usage stats: {e:?}");
                UsageRecord::new(today)
            }
        }
    }
}
