//! Core Data Models
//!
//! This module defines the data structures that flow through the usage
//! aggregation pipeline, from per-day totals up to the report handed to the
//! renderer and the HTTP layer.
//!
//! ## Data Flow
//!
//! 1. **Buckets**: [`DailyTotals`] - sessions and tokens for one calendar date
//! 2. **Tables**: [`DailyTable`] - ordered mapping of date to [`DailyTotals`]
//! 3. **Summaries**: [`UsageSummary`], [`RangeTotals`], [`LeaderboardRow`]
//! 4. **Output**: [`UsageReport`] and [`RecalcResponse`] - serializable payloads
//!
//! All public output types support serde serialization; dates serialize as
//! `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sessions and tokens attributed to a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub sessions: u64,
    pub total_tokens: u64,
}

impl DailyTotals {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sessions: 0,
            total_tokens: 0,
        }
    }

    pub fn with_values(date: NaiveDate, sessions: u64, total_tokens: u64) -> Self {
        Self {
            date,
            sessions,
            total_tokens,
        }
    }
}

/// Per-date totals for one provider (or a combination of providers).
///
/// Backed by a `BTreeMap` so iteration is always in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTable {
    days: BTreeMap<NaiveDate, DailyTotals>,
}

impl DailyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a contribution into the bucket for `date`, creating it on first use.
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, date: NaiveDate, sessions: u64, total_tokens: u64) {
        let daily = self
            .days
            .entry(date)
            .or_insert_with(|| DailyTotals::new(date));
        daily.sessions = daily.sessions.saturating_add(sessions);
        daily.total_tokens = daily.total_tokens.saturating_add(total_tokens);
    }

    /// Overwrite the session count of an existing bucket.
    pub(crate) fn set_sessions(&mut self, date: NaiveDate, sessions: u64) {
        if let Some(daily) = self.days.get_mut(&date) {
            daily.sessions = sessions;
        }
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&DailyTotals> {
        self.days.get(date)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.days.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate buckets in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DailyTotals> {
        self.days.values()
    }

    pub(crate) fn range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = &DailyTotals> {
        self.days
            .range(from..)
            .take_while(move |(date, _)| **date <= to)
            .map(|(_, daily)| daily)
    }
}

impl FromIterator<DailyTotals> for DailyTable {
    fn from_iter<I: IntoIterator<Item = DailyTotals>>(iter: I) -> Self {
        let mut table = DailyTable::new();
        for daily in iter {
            table.add(daily.date, daily.sessions, daily.total_tokens);
        }
        table
    }
}

/// Aggregate statistics over a daily table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_tokens: u64,
    pub days_with_usage: u64,
    pub sessions: u64,
    pub highest_single_day: u64,
}

/// Sessions and tokens summed over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTotals {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sessions: u64,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub date: NaiveDate,
    pub sessions: u64,
    pub total_tokens: u64,
}

/// All-time rows for one provider, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRows {
    pub available: bool,
    pub rows: Vec<DailyTotals>,
}

/// Everything a single recalculation produces for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub today: NaiveDate,
    pub year_start: NaiveDate,
    pub ytd: UsageSummary,
    pub today_range: RangeTotals,
    pub current_week: RangeTotals,
    pub previous_week: RangeTotals,
    pub two_weeks_ago: RangeTotals,
    pub leaderboard: Vec<LeaderboardRow>,
    pub codex: ProviderRows,
    pub claude: ProviderRows,
    pub combined: ProviderRows,
}

/// Body returned by the `/recalc` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalcResponse {
    pub ok: bool,
    pub updated_at: String,
    pub today: NaiveDate,
    pub ytd_total_tokens: u64,
    pub days_with_usage: u64,
    pub sessions: u64,
    pub highest_single_day: u64,
}
