use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use usage_dashboard::config::Config;

#[test]
fn test_partial_file_keeps_defaults_for_missing_sections() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("usage-dashboard.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9100

[paths]
codex_sessions = "/data/codex"
summary_json = "/data/summary.json"
"#,
    )?;

    let config = Config::load_from_file(&path)?;
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.paths.codex_sessions, PathBuf::from("/data/codex"));
    assert_eq!(config.paths.summary_json, Some(PathBuf::from("/data/summary.json")));
    assert!(config.paths.claude_projects.ends_with(".claude/projects"));
    assert_eq!(config.logging.level, "info");
    Ok(())
}

#[test]
fn test_saved_config_loads_back_identically() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config.server.host = "0.0.0.0".to_string();
    config.logging.format = "json".to_string();
    config.paths.summary_json = Some(temp_dir.path().join("summary.json"));
    config.save_to_file(&path)?;

    assert_eq!(Config::load_from_file(&path)?, config);
    Ok(())
}

#[test]
fn test_malformed_file_is_an_error() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[server\nport = ")?;

    let error = Config::load_from_file(&path).unwrap_err();
    assert!(format!("{error:#}").contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(Config::load_with_file(&temp_dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_bind_address() {
    let mut config = Config::default();
    config.server.port = 4000;
    assert_eq!(config.bind_address(), "127.0.0.1:4000");
}
