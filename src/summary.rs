//! Combination and range summaries over daily tables.
//!
//! Everything here is pure: tables in, values out, no I/O.

use crate::models::{DailyTable, DailyTotals, LeaderboardRow, RangeTotals, UsageSummary};
use chrono::{Datelike, Duration, NaiveDate};

/// Field-wise sum of several provider tables.
///
/// No deduplication happens across providers; a date missing from one input
/// contributes zero from that input.
pub fn combine_daily_totals(tables: &[&DailyTable]) -> DailyTable {
    let mut combined = DailyTable::new();
    for table in tables {
        for daily in table.iter() {
            combined.add(daily.date, daily.sessions, daily.total_tokens);
        }
    }
    combined
}

/// `(sessions, total_tokens)` over the inclusive range `[from, to]`.
pub fn sum_range(table: &DailyTable, from: NaiveDate, to: NaiveDate) -> (u64, u64) {
    if to < from {
        return (0, 0);
    }
    table
        .range(from, to)
        .fold((0u64, 0u64), |(sessions, tokens), daily| {
            (
                sessions.saturating_add(daily.sessions),
                tokens.saturating_add(daily.total_tokens),
            )
        })
}

pub fn range_totals(table: &DailyTable, from: NaiveDate, to: NaiveDate) -> RangeTotals {
    let (sessions, total_tokens) = sum_range(table, from, to);
    RangeTotals {
        from,
        to,
        sessions,
        total_tokens,
    }
}

/// Copy of `table` restricted to dates in `[from, to]`.
pub fn slice_range(table: &DailyTable, from: NaiveDate, to: NaiveDate) -> DailyTable {
    if to < from {
        return DailyTable::new();
    }
    table.range(from, to).copied().collect()
}

pub fn summarize(table: &DailyTable) -> UsageSummary {
    table.iter().fold(UsageSummary::default(), |mut summary, daily| {
        summary.total_tokens = summary.total_tokens.saturating_add(daily.total_tokens);
        summary.sessions = summary.sessions.saturating_add(daily.sessions);
        summary.days_with_usage += 1;
        summary.highest_single_day = summary.highest_single_day.max(daily.total_tokens);
        summary
    })
}

/// Dates ranked by tokens descending, ties broken by ascending date.
pub fn leaderboard(table: &DailyTable) -> Vec<LeaderboardRow> {
    let mut days: Vec<&DailyTotals> = table.iter().collect();
    days.sort_by(|a, b| {
        b.total_tokens
            .cmp(&a.total_tokens)
            .then_with(|| a.date.cmp(&b.date))
    });

    days.into_iter()
        .enumerate()
        .map(|(idx, daily)| LeaderboardRow {
            rank: idx + 1,
            date: daily.date,
            sessions: daily.sessions,
            total_tokens: daily.total_tokens,
        })
        .collect()
}

/// All rows, newest date first.
pub fn rows_descending(table: &DailyTable) -> Vec<DailyTotals> {
    table.iter().rev().copied().collect()
}

/// The four fixed ranges shown on the dashboard, relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingRanges {
    pub today: (NaiveDate, NaiveDate),
    /// Monday of the current week through yesterday; empty on Mondays.
    pub current_week: (NaiveDate, NaiveDate),
    pub previous_week: (NaiveDate, NaiveDate),
    pub two_weeks_ago: (NaiveDate, NaiveDate),
}

impl TrailingRanges {
    pub fn for_today(today: NaiveDate) -> Self {
        let current_monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let yesterday = today - Duration::days(1);

        let previous_monday = current_monday - Duration::days(7);
        let previous_sunday = current_monday - Duration::days(1);

        let two_weeks_monday = previous_monday - Duration::days(7);
        let two_weeks_sunday = previous_monday - Duration::days(1);

        Self {
            today: (today, today),
            current_week: (current_monday, yesterday),
            previous_week: (previous_monday, previous_sunday),
            two_weeks_ago: (two_weeks_monday, two_weeks_sunday),
        }
    }
}

pub fn year_start(today: NaiveDate) -> NaiveDate {
    today.with_ordinal(1).unwrap_or(today)
}
