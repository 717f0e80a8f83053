#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `lines` as a JSONL file at `root/relative`, creating parent dirs.
pub fn write_jsonl(root: &Path, relative: &str, lines: &[String]) -> Result<PathBuf> {
    let file_path = root.join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&file_path, content)?;
    Ok(file_path)
}

pub fn codex_token_count(total_tokens: u64) -> String {
    format!(
        r#"{{"timestamp":"2026-02-27T10:00:00Z","type":"event_msg","payload":{{"type":"token_count","info":{{"total_token_usage":{{"input_tokens":1,"output_tokens":1,"total_tokens":{total_tokens}}}}}}}}}"#
    )
}

pub fn codex_agent_message() -> String {
    r#"{"timestamp":"2026-02-27T10:00:00Z","type":"event_msg","payload":{"type":"agent_message","message":"done"}}"#
        .to_string()
}

/// A Claude assistant line with the four usage counters.
pub fn claude_request(
    session_id: &str,
    request_id: &str,
    timestamp: &str,
    usage: [u64; 4],
) -> String {
    let [input, cache_creation, cache_read, output] = usage;
    format!(
        r#"{{"type":"assistant","sessionId":"{session_id}","requestId":"{request_id}","timestamp":"{timestamp}","message":{{"model":"claude-sonnet-4","usage":{{"input_tokens":{input},"cache_creation_input_tokens":{cache_creation},"cache_read_input_tokens":{cache_read},"output_tokens":{output}}}}}}}"#
    )
}

pub fn dashboard_template() -> &'static str {
    r#"<html>
<body>
    <section class="stats">
      <article class="stat"><div class="label">placeholder</div></article>
    </section>
    <table>
      <tbody>
        <tr><td>stale</td></tr>
      </tbody>
    </table>
    <section class="providers">
      <p>stale providers</p>
    </section>
</body>
</html>
"#
}

/// Temporary layout with empty codex and claude roots and a dashboard page.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("codex"))?;
        fs::create_dir_all(dir.path().join("claude"))?;
        fs::write(dir.path().join("index.html"), dashboard_template())?;
        Ok(Self { dir })
    }

    pub fn codex_root(&self) -> PathBuf {
        self.dir.path().join("codex")
    }

    pub fn claude_root(&self) -> PathBuf {
        self.dir.path().join("claude")
    }

    pub fn dashboard(&self) -> PathBuf {
        self.dir.path().join("index.html")
    }

    pub fn paths(&self) -> usage_dashboard::config::PathsConfig {
        usage_dashboard::config::PathsConfig {
            codex_sessions: self.codex_root(),
            claude_projects: self.claude_root(),
            dashboard_html: self.dashboard(),
            summary_json: None,
            log_directory: self.dir.path().join("logs"),
        }
    }
}
