//! Day bucketing for both providers.
//!
//! Codex contributes whole sessions (one per file), so its buckets count
//! sessions incrementally. Claude contributes merged requests, so session
//! counts are recomputed from the set of distinct session ids per date once
//! every request has been folded in.

use crate::dedup::{MergedRequest, RequestKey};
use crate::models::DailyTable;
use crate::timestamp_parser::TimestampParser;
use chrono::{NaiveDate, TimeZone};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Accumulates one-session-per-file contributions.
#[derive(Debug, Default)]
pub struct DayBucketer {
    table: DailyTable,
}

impl DayBucketer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, date: NaiveDate, total_tokens: u64) {
        self.table.add(date, 1, total_tokens);
    }

    pub fn finish(self) -> DailyTable {
        self.table
    }
}

/// Bucket merged requests by the date of their merged timestamp in `tz`.
pub fn bucket_requests<Tz: TimeZone>(
    merged: &HashMap<RequestKey, MergedRequest>,
    tz: &Tz,
) -> DailyTable {
    let mut table = DailyTable::new();
    let mut sessions_per_day: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();

    for (key, request) in merged {
        let date = TimestampParser::to_date_in(&request.timestamp, tz);
        table.add(date, 0, request.usage.total());
        sessions_per_day
            .entry(date)
            .or_default()
            .insert(key.session_id.as_str());
    }

    for (date, sessions) in sessions_per_day {
        table.set_sessions(date, sessions.len() as u64);
    }

    table
}
