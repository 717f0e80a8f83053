//! Claude project logs.
//!
//! Every `*.jsonl` file below the projects root is a conversation log. Lines
//! that carry a `requestId`, a `timestamp` and a `message.usage` object are
//! request observations; everything else is ignored.

use super::{process_jsonl_file, JsonlProcessor};
use crate::aggregator::bucket_requests;
use crate::dedup::{DeduplicationEngine, RequestKey, RequestObservation, RequestUsage};
use crate::file_discovery::FileDiscovery;
use crate::models::DailyTable;
use crate::timestamp_parser::TimestampParser;
use chrono::{Local, TimeZone};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RequestLine {
    #[serde(rename = "requestId")]
    request_id: Option<Value>,
    #[serde(rename = "sessionId")]
    session_id: Option<Value>,
    timestamp: Option<Value>,
    message: Option<Value>,
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Negative, fractional, or missing counters count as zero.
fn counter(usage: &Map<String, Value>, field: &str) -> u64 {
    usage.get(field).and_then(Value::as_u64).unwrap_or(0)
}

/// Decode one log line into a request observation.
///
/// `fallback_session` is used when the line has no usable `sessionId`.
pub fn parse_request_line(line: &str, fallback_session: &str) -> Option<RequestObservation> {
    let record: RequestLine = serde_json::from_str(line).ok()?;

    let request_id = non_empty_str(record.request_id.as_ref())?;
    let timestamp = record
        .timestamp
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|raw| TimestampParser::parse(raw).ok())?;
    let usage = record.message.as_ref()?.get("usage")?.as_object()?;

    let session_id = non_empty_str(record.session_id.as_ref()).unwrap_or(fallback_session);

    Some(RequestObservation {
        key: RequestKey::new(session_id, request_id),
        timestamp,
        usage: RequestUsage {
            input_tokens: counter(usage, "input_tokens"),
            cache_creation_input_tokens: counter(usage, "cache_creation_input_tokens"),
            cache_read_input_tokens: counter(usage, "cache_read_input_tokens"),
            output_tokens: counter(usage, "output_tokens"),
        },
    })
}

/// Collects the request observations of one file
pub struct RequestObservationCollector {
    fallback_session: String,
    observations: Vec<RequestObservation>,
}

impl RequestObservationCollector {
    pub fn new(fallback_session: impl Into<String>) -> Self {
        Self {
            fallback_session: fallback_session.into(),
            observations: Vec::new(),
        }
    }
}

impl JsonlProcessor for RequestObservationCollector {
    type Output = Vec<RequestObservation>;

    fn process_line(&mut self, line: &str, _line_number: usize) {
        if let Some(observation) = parse_request_line(line, &self.fallback_session) {
            self.observations.push(observation);
        }
    }

    fn finalize(self) -> Self::Output {
        self.observations
    }
}

/// Per-day Claude totals bucketed by the local calendar date.
pub fn collect_claude_daily_totals(root: &Path) -> DailyTable {
    collect_claude_daily_totals_in(root, &Local)
}

/// Per-day Claude totals bucketed by the calendar date in `tz`.
pub fn collect_claude_daily_totals_in<Tz: TimeZone>(root: &Path, tz: &Tz) -> DailyTable {
    let files = match FileDiscovery::find_jsonl_files(root) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "Claude log discovery failed");
            return DailyTable::new();
        }
    };

    let mut engine = DeduplicationEngine::new();
    for file_path in &files {
        let collector = RequestObservationCollector::new(FileDiscovery::session_stem(file_path));
        match process_jsonl_file(file_path, collector) {
            Ok(observations) => engine.extend(observations),
            Err(e) => {
                tracing::warn!(path = %file_path.display(), error = %e, "Skipping unreadable log file");
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        files = files.len(),
        requests = engine.len(),
        duplicates = engine.duplicates(),
        "Deduplicated Claude requests"
    );

    bucket_requests(&engine.into_merged(), tz)
}
