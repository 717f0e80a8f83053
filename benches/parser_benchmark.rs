//! Performance benchmarks for the provider parsers
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use usage_dashboard::providers::claude::collect_claude_daily_totals_in;
use usage_dashboard::providers::codex::parse_session_usage;

/// Codex session with `num_lines` events, every fourth one a token_count snapshot
fn generate_codex_session(num_lines: usize) -> String {
    let mut lines = Vec::with_capacity(num_lines);
    for i in 0..num_lines {
        if i % 4 == 0 {
            lines.push(format!(
                r#"{{"timestamp":"2026-02-27T10:00:00Z","type":"event_msg","payload":{{"type":"token_count","info":{{"total_token_usage":{{"total_tokens":{}}}}}}}}}"#,
                i * 100
            ));
        } else {
            lines.push(format!(
                r#"{{"timestamp":"2026-02-27T10:00:00Z","type":"response_item","payload":{{"type":"message","content":"line {}"}}}}"#,
                i
            ));
        }
    }
    lines.join("\n")
}

/// Claude log where every request is logged twice with growing output
fn generate_claude_log(num_requests: usize, include_errors: bool) -> String {
    let mut lines = Vec::with_capacity(num_requests * 2);
    for i in 0..num_requests {
        for output in [i % 50, i % 50 + 100] {
            lines.push(format!(
                r#"{{"sessionId":"session-{}","requestId":"req_{}","timestamp":"2026-02-27T10:{:02}:00Z","message":{{"usage":{{"input_tokens":{},"cache_creation_input_tokens":{},"cache_read_input_tokens":{},"output_tokens":{}}}}}}}"#,
                i % 7,
                i,
                i % 60,
                100 + i,
                i % 30,
                i % 100,
                output
            ));
        }
        if include_errors && i % 10 == 5 {
            lines.push("{broken json}".to_string());
        }
    }
    lines.join("\n")
}

fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn benchmark_codex_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("codex_session");

    for size in [100, 1000, 10000].iter() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "2026/02/27/session.jsonl", &generate_codex_session(*size));
        let path = temp_dir.path().join("2026/02/27/session.jsonl");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| parse_session_usage(black_box(&path)))
        });
    }

    group.finish();
}

fn benchmark_claude_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("claude_dedup");

    for (name, include_errors) in [("clean", false), ("with_errors", true)] {
        for size in [100, 1000, 10000].iter() {
            let temp_dir = TempDir::new().unwrap();
            write_file(temp_dir.path(), "project/log.jsonl", &generate_claude_log(*size, include_errors));

            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| collect_claude_daily_totals_in(black_box(temp_dir.path()), &chrono::Utc))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_codex_session, benchmark_claude_dedup);
criterion_main!(benches);
