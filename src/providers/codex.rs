//! Codex session logs.
//!
//! Sessions live at `root/YYYY/MM/DD/<name>.jsonl`. Each `token_count` event
//! carries the cumulative total for the session, so the last one in the file
//! is the session's usage.

use super::{process_jsonl_file, JsonlProcessor};
use crate::aggregator::DayBucketer;
use crate::file_discovery::FileDiscovery;
use crate::models::DailyTable;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CodexEvent {
    #[serde(rename = "type")]
    kind: Option<String>,
    payload: Option<EventPayload>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<TokenCountInfo>,
}

#[derive(Debug, Deserialize)]
struct TokenCountInfo {
    total_token_usage: Option<TotalTokenUsage>,
}

#[derive(Debug, Deserialize)]
struct TotalTokenUsage {
    total_tokens: Option<u64>,
}

/// Extract the cumulative total from a `token_count` event line.
fn snapshot_total(line: &str) -> Option<u64> {
    let event: CodexEvent = serde_json::from_str(line).ok()?;
    if event.kind.as_deref() != Some("event_msg") {
        return None;
    }
    let payload = event.payload?;
    if payload.kind.as_deref() != Some("token_count") {
        return None;
    }
    payload.info?.total_token_usage?.total_tokens
}

/// Tracks the last valid snapshot seen in a file
#[derive(Default)]
pub struct LatestSnapshotProcessor {
    latest: Option<u64>,
}

impl JsonlProcessor for LatestSnapshotProcessor {
    type Output = Option<u64>;

    fn process_line(&mut self, line: &str, _line_number: usize) {
        if let Some(total) = snapshot_total(line) {
            self.latest = Some(total);
        }
    }

    fn finalize(self) -> Self::Output {
        self.latest
    }
}

/// Usage of one session file, or `None` when it holds no valid snapshot.
pub fn parse_session_usage(session_path: &Path) -> anyhow::Result<Option<u64>> {
    process_jsonl_file(session_path, LatestSnapshotProcessor::default())
}

/// Per-day Codex totals for every session file under `root`.
pub fn collect_codex_daily_totals(root: &Path) -> DailyTable {
    let files = match FileDiscovery::find_jsonl_files(root) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "Codex session discovery failed");
            return DailyTable::new();
        }
    };

    let mut bucketer = DayBucketer::new();
    let mut skipped_paths = 0usize;

    for file_path in &files {
        let Some(usage_date) = FileDiscovery::date_from_session_path(root, file_path) else {
            skipped_paths += 1;
            tracing::debug!(path = %file_path.display(), "Session path does not decode to a date");
            continue;
        };

        match parse_session_usage(file_path) {
            Ok(Some(total_tokens)) => bucketer.add_session(usage_date, total_tokens),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %file_path.display(), error = %e, "Skipping unreadable session file");
            }
        }
    }

    let table = bucketer.finish();
    tracing::debug!(
        root = %root.display(),
        files = files.len(),
        skipped_paths,
        days = table.len(),
        "Collected Codex daily totals"
    );
    table
}
