//! Recalculation Engine
//!
//! [`UsageAnalyzer`] orchestrates one full recalculation: both providers are
//! parsed from scratch, combined, summarized, and handed to the renderer.
//! Nothing is cached between runs, so every call reflects exactly the files
//! present at call time.
//!
//! ## Pipeline
//!
//! 1. **Parsing**: Codex sessions and Claude request logs into per-day tables
//! 2. **Combination**: field-wise sum of the provider tables
//! 3. **Year to date**: slice of the combined table from January 1 through today
//! 4. **Summaries**: YTD statistics, leaderboard, four trailing ranges
//! 5. **Rendering**: dashboard HTML splice and optional JSON summary file
//!
//! ## Usage Example
//!
//! ```no_run
//! use usage_dashboard::analyzer::UsageAnalyzer;
//! use usage_dashboard::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let analyzer = UsageAnalyzer::new(config.paths);
//! let response = analyzer.recalc_dashboard(chrono::Local::now().date_naive())?;
//! println!("{} tokens this year", response.ytd_total_tokens);
//! # Ok(())
//! # }
//! ```

use crate::config::PathsConfig;
use crate::display;
use crate::models::{DailyTable, ProviderRows, RecalcResponse, UsageReport};
use crate::providers::{collect_claude_daily_totals, collect_codex_daily_totals};
use crate::summary::{self, TrailingRanges};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::fs;
use std::path::Path;
use tracing::info;

/// Per-provider tables from one scan of the filesystem
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderTables {
    pub codex: DailyTable,
    pub claude: DailyTable,
    pub combined: DailyTable,
}

impl ProviderTables {
    pub fn new(codex: DailyTable, claude: DailyTable) -> Self {
        let combined = summary::combine_daily_totals(&[&codex, &claude]);
        Self {
            codex,
            claude,
            combined,
        }
    }

    /// Derive the full report for `today` from already collected tables.
    pub fn report(&self, today: NaiveDate) -> UsageReport {
        let year_start = summary::year_start(today);
        let ytd = summary::slice_range(&self.combined, year_start, today);
        let ranges = TrailingRanges::for_today(today);
        let range = |(from, to): (NaiveDate, NaiveDate)| summary::range_totals(&self.combined, from, to);

        UsageReport {
            today,
            year_start,
            ytd: summary::summarize(&ytd),
            today_range: range(ranges.today),
            current_week: range(ranges.current_week),
            previous_week: range(ranges.previous_week),
            two_weeks_ago: range(ranges.two_weeks_ago),
            leaderboard: summary::leaderboard(&ytd),
            codex: provider_rows(&self.codex),
            claude: provider_rows(&self.claude),
            combined: provider_rows(&self.combined),
        }
    }
}

fn provider_rows(table: &DailyTable) -> ProviderRows {
    let rows = summary::rows_descending(table);
    ProviderRows {
        available: !rows.is_empty(),
        rows,
    }
}

pub struct UsageAnalyzer {
    paths: PathsConfig,
}

impl UsageAnalyzer {
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    /// Scan both providers fresh.
    pub fn collect(&self) -> ProviderTables {
        let codex = collect_codex_daily_totals(&self.paths.codex_sessions);
        let claude = collect_claude_daily_totals(&self.paths.claude_projects);
        ProviderTables::new(codex, claude)
    }

    pub fn build_report(&self, today: NaiveDate) -> UsageReport {
        self.collect().report(today)
    }

    /// Recalculate, render the dashboard file, and return the response body.
    pub fn recalc_dashboard(&self, today: NaiveDate) -> Result<RecalcResponse> {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("recalc", run_id = %run_id, today = %today);
        let _enter = span.enter();

        let report = self.build_report(today);
        render_dashboard_file(&self.paths.dashboard_html, &report)?;

        if let Some(summary_path) = &self.paths.summary_json {
            write_summary_json(summary_path, &report)?;
        }

        info!(
            ytd_total_tokens = report.ytd.total_tokens,
            days_with_usage = report.ytd.days_with_usage,
            sessions = report.ytd.sessions,
            codex_available = report.codex.available,
            claude_available = report.claude.available,
            "Dashboard recalculated"
        );

        Ok(RecalcResponse {
            ok: true,
            updated_at: Utc::now().to_rfc3339(),
            today,
            ytd_total_tokens: report.ytd.total_tokens,
            days_with_usage: report.ytd.days_with_usage,
            sessions: report.ytd.sessions,
            highest_single_day: report.ytd.highest_single_day,
        })
    }
}

/// Splice the report into an existing dashboard page in place.
pub fn render_dashboard_file(dashboard: &Path, report: &UsageReport) -> Result<()> {
    let html = fs::read_to_string(dashboard)
        .with_context(|| format!("Failed to read dashboard: {}", dashboard.display()))?;
    let rendered = display::splice_dashboard(&html, report);
    fs::write(dashboard, rendered)
        .with_context(|| format!("Failed to write dashboard: {}", dashboard.display()))?;
    Ok(())
}

pub fn write_summary_json(path: &Path, report: &UsageReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize usage report")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary JSON: {}", path.display()))?;
    Ok(())
}
