use chrono::NaiveDate;
use tempfile::TempDir;
use usage_dashboard::providers::codex::parse_session_usage;
use usage_dashboard::providers::collect_codex_daily_totals;

mod common;
use common::{codex_agent_message, codex_token_count, write_jsonl};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_latest_snapshot_per_session_is_summed_per_day() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    write_jsonl(
        root,
        "2026/02/27/rollout-a.jsonl",
        &[codex_token_count(100), codex_agent_message(), codex_token_count(250)],
    )?;
    write_jsonl(root, "2026/02/27/rollout-b.jsonl", &[codex_token_count(75)])?;
    write_jsonl(root, "2026/02/28/rollout-c.jsonl", &[codex_token_count(10)])?;

    let table = collect_codex_daily_totals(root);

    let day = table.get(&date(2026, 2, 27)).unwrap();
    assert_eq!(day.sessions, 2);
    assert_eq!(day.total_tokens, 325);
    assert_eq!(table.get(&date(2026, 2, 28)).unwrap().total_tokens, 10);
    assert_eq!(table.len(), 2);
    Ok(())
}

#[test]
fn test_file_without_valid_snapshot_contributes_nothing() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    write_jsonl(
        root,
        "2026/03/01/empty.jsonl",
        &[
            codex_agent_message(),
            "{not json".to_string(),
            r#"{"type":"event_msg","payload":{"type":"token_count","info":null}}"#.to_string(),
        ],
    )?;

    let table = collect_codex_daily_totals(root);
    assert!(!table.contains(&date(2026, 3, 1)));
    assert!(table.is_empty());
    Ok(())
}

#[test]
fn test_malformed_lines_do_not_hide_later_snapshots() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_jsonl(
        temp_dir.path(),
        "2026/03/02/session.jsonl",
        &[
            codex_token_count(5),
            "garbage".to_string(),
            String::new(),
            codex_token_count(42),
            r#"{"type":"event_msg","payload":{"type":"token_count","info":{"total_token_usage":{"total_tokens":-1}}}}"#
                .to_string(),
        ],
    )?;

    assert_eq!(parse_session_usage(&path)?, Some(42));
    Ok(())
}

#[test]
fn test_paths_that_do_not_decode_to_a_date_are_skipped() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    write_jsonl(root, "2026/02/30/impossible.jsonl", &[codex_token_count(1)])?;
    write_jsonl(root, "2026/02/shallow.jsonl", &[codex_token_count(2)])?;
    write_jsonl(root, "archive/02/27/named.jsonl", &[codex_token_count(3)])?;
    write_jsonl(root, "2026/02/27/valid.jsonl", &[codex_token_count(4)])?;

    let table = collect_codex_daily_totals(root);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&date(2026, 2, 27)).unwrap().total_tokens, 4);
    Ok(())
}

#[test]
fn test_nested_directories_below_the_day_still_count() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    write_jsonl(root, "2026/04/01/sub/deeper.jsonl", &[codex_token_count(9)])?;

    let table = collect_codex_daily_totals(root);
    assert_eq!(table.get(&date(2026, 4, 1)).unwrap().sessions, 1);
    Ok(())
}

#[test]
fn test_huge_session_totals_saturate() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    write_jsonl(root, "2026/02/27/a.jsonl", &[codex_token_count(u64::MAX)])?;
    write_jsonl(root, "2026/02/27/b.jsonl", &[codex_token_count(5)])?;

    let table = collect_codex_daily_totals(root);
    let day = table.get(&date(2026, 2, 27)).unwrap();
    assert_eq!(day.total_tokens, u64::MAX);
    assert_eq!(day.sessions, 2);
    Ok(())
}

#[test]
fn test_missing_root_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let table = collect_codex_daily_totals(&temp_dir.path().join("does-not-exist"));
    assert!(table.is_empty());
}
