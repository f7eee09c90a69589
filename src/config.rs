// ABOUTME: Configuration loading for pdfchat.
// ABOUTME: Reads ~/.pdfchat/config.toml, applies PDFCHAT_* environment overrides, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::controller::readiness::RetryPolicy;

/// Environment variable that overrides `service.base_url`.
pub const BASE_URL_ENV: &str = "PDFCHAT_BASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub readiness: ReadinessConfig,
    pub ask: AskConfig,
    pub export: ExportConfig,
}

/// Where the question-answering backend lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Liveness probe retry schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl ReadinessConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

/// How overlapping questions are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskOrdering {
    /// Every question is sent immediately; answers land in completion order.
    #[default]
    Concurrent,
    /// One question in flight at a time; one more may wait in a queue slot.
    Serialized,
}

/// Question settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AskConfig {
    pub ordering: AskOrdering,
}

/// Transcript export settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
    /// Empty means the user's download directory, falling back to the working directory.
    pub directory: String,
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "qa_summary.pdf".to_string(),
            directory: String::new(),
            title: "PDF Q&A Summary".to_string(),
        }
    }
}

impl ExportConfig {
    /// Full path the summary document is written to.
    pub fn output_path(&self) -> PathBuf {
        let dir = if self.directory.is_empty() {
            dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
        } else {
            expand_home(&self.directory)
        };
        dir.join(&self.file_name)
    }
}

impl Config {
    /// Load config from ~/.pdfchat/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides (after `.env` has been loaded).
    pub fn apply_env(&mut self) {
        self.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
    }

    fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|s| !s.trim().is_empty()) {
            self.service.base_url = url;
        }
    }

    /// Directory holding config and logs.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pdfchat")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Path to the log file.
    pub fn log_path() -> PathBuf {
        Self::home_dir().join("logs").join("pdfchat.log")
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.readiness.max_attempts, 6);
        assert_eq!(config.ask.ordering, AskOrdering::Concurrent);
        assert_eq!(config.export.file_name, "qa_summary.pdf");
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
[service]
base_url = "https://qa.example.com"

[readiness]
max_attempts = 3
initial_delay_ms = 100
max_delay_ms = 400

[ask]
ordering = "serialized"

[export]
file_name = "notes.pdf"
directory = "/tmp/exports"
title = "Notes"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.base_url, "https://qa.example.com");
        assert_eq!(config.readiness.max_attempts, 3);
        assert_eq!(config.ask.ordering, AskOrdering::Serialized);
        assert_eq!(config.export.title, "Notes");
        assert_eq!(
            config.export.output_path(),
            PathBuf::from("/tmp/exports/notes.pdf")
        );
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml_str = r#"
[ask]
ordering = "concurrent"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.readiness.initial_delay_ms, 500);
        assert_eq!(config.export.title, "PDF Q&A Summary");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.readiness.max_delay_ms, 8_000);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[service\nbase_url = 1").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn env_override_replaces_base_url() {
        let mut config = Config::default();
        config.apply_base_url_override(Some("http://10.0.0.5:9000".to_string()));
        assert_eq!(config.service.base_url, "http://10.0.0.5:9000");

        config.apply_base_url_override(Some("   ".to_string()));
        assert_eq!(config.service.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn zero_attempts_still_probes_once() {
        let readiness = ReadinessConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(readiness.policy().max_attempts, 1);
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/var/tmp/a.pdf"), PathBuf::from("/var/tmp/a.pdf"));
        assert_eq!(expand_home("docs/a.pdf"), PathBuf::from("docs/a.pdf"));
    }
}
