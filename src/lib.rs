//! Usage Dashboard Library
//!
//! Aggregates per-day AI-assistant token usage from two local log sources
//! and renders the result into a static HTML dashboard plus a JSON summary.
//!
//! ## Sources
//!
//! - **Codex** session logs under `~/.codex/sessions/YYYY/MM/DD/*.jsonl`, where
//!   each file is one session and the last `token_count` snapshot is its total
//! - **Claude** project logs under `~/.claude/projects/**/*.jsonl`, where each
//!   request may be logged several times and is deduplicated by
//!   `(sessionId, requestId)`
//!
//! ## Architecture Overview
//!
//! - [`file_discovery`] - recursive log discovery and date-from-path decoding
//! - [`providers`] - one parser per source format
//! - [`dedup`] - order-independent merge of repeated request observations
//! - [`aggregator`] - folds sessions and requests into per-day buckets
//! - [`summary`] - provider combination, range sums, leaderboard
//! - [`analyzer`] - the recalculation orchestrator
//! - [`display`] - HTML splicing, JSON and terminal output
//! - [`server`] - the local HTTP endpoint
//! - [`config`] - configuration with file and environment support
//! - [`logging`] - structured logging setup
//!
//! ## Main Entry Point
//!
//! ```no_run
//! use usage_dashboard::UsageAnalyzer;
//! use usage_dashboard::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let analyzer = UsageAnalyzer::new(Config::load()?.paths);
//! let report = analyzer.build_report(chrono::Local::now().date_naive());
//! println!("{} tokens across {} days", report.ytd.total_tokens, report.ytd.days_with_usage);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod dedup;
pub mod display;
pub mod file_discovery;
pub mod logging;
pub mod models;
pub mod providers;
pub mod server;
pub mod summary;
pub mod timestamp_parser;

pub use analyzer::UsageAnalyzer;
pub use models::*;
