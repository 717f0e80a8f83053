//! Configuration system
//!
//! Provides configuration management with:
//! - Config file loading (optional)
//! - Environment variable overrides
//! - Runtime defaults
//! - Validation
//!
//! The loaded [`Config`] is passed explicitly to the analyzer and server, so
//! the aggregation engine never reads ambient process state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Input and output locations
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub codex_sessions: PathBuf,
    pub claude_projects: PathBuf,
    pub dashboard_html: PathBuf,
    /// When set, every recalculation also writes the full report here
    pub summary_json: Option<PathBuf>,
    pub log_directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            codex_sessions: home.join(".codex").join("sessions"),
            claude_projects: home.join(".claude").join("projects"),
            dashboard_html: PathBuf::from("dashboard").join("index.html"),
            summary_json: None,
            log_directory: PathBuf::from("logs"),
        }
    }
}

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];
const LOG_OUTPUTS: [&str; 3] = ["console", "file", "both"];

impl Config {
    /// Load configuration from file, environment, and defaults
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("usage-dashboard.toml"),
            PathBuf::from(".usage-dashboard.toml"),
            dirs::config_dir()
                .map(|d| d.join("usage-dashboard").join("config.toml"))
                .unwrap_or_default(),
        ];

        let mut config = Config::default();
        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, then apply environment overrides
    pub fn load_with_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_with(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Logging overrides
        if let Some(val) = lookup("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Some(val) = lookup("LOG_OUTPUT") {
            self.logging.output = val;
        }

        // Server overrides
        if let Some(val) = lookup("CODEX_USAGE_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("CODEX_USAGE_SERVER_PORT") {
            self.server.port = val
                .parse()
                .context("Invalid CODEX_USAGE_SERVER_PORT")?;
        }

        // Path overrides
        if let Some(val) = lookup("CODEX_USAGE_DASHBOARD_HTML") {
            self.paths.dashboard_html = PathBuf::from(val);
        }
        if let Some(val) = lookup("CODEX_USAGE_SESSIONS_ROOT") {
            self.paths.codex_sessions = PathBuf::from(val);
        }
        if let Some(val) = lookup("CLAUDE_USAGE_PROJECTS_ROOT") {
            self.paths.claude_projects = PathBuf::from(val);
        }
        if let Some(val) = lookup("USAGE_SUMMARY_JSON") {
            self.paths.summary_json = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("USAGE_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(anyhow::anyhow!("Server host must not be empty"));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port must be greater than 0"));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Unknown log format '{}', expected one of {:?}",
                self.logging.format,
                LOG_FORMATS
            ));
        }

        if !LOG_OUTPUTS.contains(&self.logging.output.as_str()) {
            return Err(anyhow::anyhow!(
                "Unknown log output '{}', expected one of {:?}",
                self.logging.output,
                LOG_OUTPUTS
            ));
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8765);
        assert!(config.paths.codex_sessions.ends_with(".codex/sessions"));
        assert!(config.paths.claude_projects.ends_with(".claude/projects"));
        assert!(config.paths.summary_json.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config
            .apply_overrides_with(lookup_from(&[
                ("CODEX_USAGE_SERVER_PORT", "9000"),
                ("CODEX_USAGE_SESSIONS_ROOT", "/tmp/codex"),
                ("USAGE_SUMMARY_JSON", "/tmp/summary.json"),
            ]))
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.paths.codex_sessions, PathBuf::from("/tmp/codex"));
        assert_eq!(config.paths.summary_json, Some(PathBuf::from("/tmp/summary.json")));
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = Config::default();
        let result = config.apply_overrides_with(lookup_from(&[("CODEX_USAGE_SERVER_PORT", "http")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.output = "syslog".to_string();
        assert!(config.validate().is_err());
    }
}
