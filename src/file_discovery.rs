use anyhow::{Context, Result};
use chrono::NaiveDate;
use glob::{glob, Pattern};
use std::path::{Component, Path, PathBuf};

/// Handles file system traversal and discovery of usage log files
pub struct FileDiscovery;

impl FileDiscovery {
    /// Find every `*.jsonl` file below `root`, at any depth.
    ///
    /// A missing root yields an empty list. Results are sorted so repeated
    /// runs see files in the same order.
    pub fn find_jsonl_files(root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "Log root does not exist, treating as empty");
            return Ok(Vec::new());
        }

        let escaped_root = Pattern::escape(&root.to_string_lossy());
        let pattern = format!("{}/**/*.jsonl", escaped_root.trim_end_matches('/'));

        let mut files: Vec<PathBuf> = glob(&pattern)
            .with_context(|| format!("Invalid glob pattern for root: {}", root.display()))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable path during discovery");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        files.sort();
        Ok(files)
    }

    /// Decode the `YYYY/MM/DD/...` prefix of a session file path.
    ///
    /// The path relative to `root` needs at least four components and the
    /// first three must form a valid calendar date.
    pub fn date_from_session_path(root: &Path, file_path: &Path) -> Option<NaiveDate> {
        let relative = file_path.strip_prefix(root).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();

        if parts.len() < 4 {
            return None;
        }

        let year: i32 = parts[0].parse().ok()?;
        let month: u32 = parts[1].parse().ok()?;
        let day: u32 = parts[2].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// File stem used as the fallback session identifier
    pub fn session_stem(file_path: &Path) -> String {
        file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
