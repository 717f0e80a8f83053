//! Provider Parsers
//!
//! One parser per log source. Both sources are line-delimited JSON; every
//! line is decoded independently and malformed lines are skipped, so a
//! single corrupt record never hides the rest of a file.
//!
//! - [`codex`] - cumulative `token_count` snapshots, one session per file,
//!   dated by the `YYYY/MM/DD` directory layout
//! - [`claude`] - per-request usage with cache/output breakdown, deduplicated
//!   by `(sessionId, requestId)` and dated by the local date of the timestamp
//!
//! File reading goes through [`process_jsonl_file`] with a [`JsonlProcessor`]
//! that decides what each line means.

pub mod claude;
pub mod codex;

pub use claude::collect_claude_daily_totals;
pub use codex::collect_codex_daily_totals;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Line-by-line consumer of a JSONL file
pub trait JsonlProcessor {
    type Output;

    /// Handle one non-blank, trimmed line. Lines the processor does not
    /// understand are ignored.
    fn process_line(&mut self, line: &str, line_number: usize);

    fn finalize(self) -> Self::Output;
}

/// Feed every non-blank line of `file_path` to `processor`.
///
/// Invalid UTF-8 is replaced rather than treated as an error.
pub fn process_jsonl_file<P: JsonlProcessor>(file_path: &Path, mut processor: P) -> Result<P::Output> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open log file: {}", file_path.display()))?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .with_context(|| format!("Failed to read log file: {}", file_path.display()))?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        processor.process_line(line, line_number);
    }

    Ok(processor.finalize())
}
