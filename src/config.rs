// src/config.rs
//! Client configuration: optional `hireboard.yaml` plus environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::StatusSet;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const CONFIG_FILE: &str = "hireboard.yaml";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub status_set: StatusSet,
    pub state_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            status_set: StatusSet::standard(),
            state_path: base_dir.join(".hireboard").join("session.json"),
            log_path: PathBuf::from("/tmp/hireboard.log"),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_status_set(mut self, status_set: StatusSet) -> Self {
        self.status_set = status_set;
        self
    }

    pub fn with_state_path(mut self, path: PathBuf) -> Self {
        self.state_path = path;
        self
    }
}

/// One environment section of `hireboard.yaml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentSection {
    pub api_base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub status_set: Option<String>,
    pub state_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentSection,
    #[serde(default)]
    production: EnvironmentSection,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration for the current environment
    pub fn load() -> Result<ClientConfig> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let section = Self::load_section(Path::new(CONFIG_FILE), &environment)?;
        let config = Self::resolve(section, |key| std::env::var(key).ok())?;

        info!(
            "API base URL: {} (statuses: {})",
            config.api_base_url,
            config.status_set.name()
        );
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("HIREBOARD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Read the section for `environment`; a missing file means defaults.
    pub fn load_section(path: &Path, environment: &str) -> Result<EnvironmentSection> {
        if !path.exists() {
            return Ok(EnvironmentSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    /// Merge defaults, the file section, then environment variables.
    pub fn resolve<F>(section: EnvironmentSection, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();

        if let Some(url) = env("HIREBOARD_API_URL").or(section.api_base_url) {
            config = config.with_base_url(&url);
        }

        if let Some(raw) = env("HIREBOARD_TIMEOUT_SECS") {
            config.timeout_seconds = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("HIREBOARD_TIMEOUT_SECS must be a number of seconds"))?;
        } else if let Some(secs) = section.timeout_seconds {
            config.timeout_seconds = secs;
        }

        if let Some(raw) = env("HIREBOARD_STATUS_SET").or(section.status_set) {
            config.status_set = raw.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }

        if let Some(path) = env("HIREBOARD_STATE_PATH")
            .map(PathBuf::from)
            .or(section.state_path)
        {
            config.state_path = path;
        }

        if let Some(path) = env("HIREBOARD_LOG_PATH").map(PathBuf::from).or(section.log_path) {
            config.log_path = path;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_file_section() {
        let section = EnvironmentSection {
            api_base_url: Some("http://file:4000/api".into()),
            timeout_seconds: Some(30),
            status_set: Some("legacy".into()),
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [("HIREBOARD_API_URL", "https://jobs.example.com/api/")].into();

        let config = ConfigManager::resolve(section, |key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.api_base_url, "https://jobs.example.com/api");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.status_set.initial().as_str(), "received");
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = ConfigManager::resolve(EnvironmentSection::default(), |_| None).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.status_set, StatusSet::standard());
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let result = ConfigManager::resolve(EnvironmentSection::default(), |key| {
            (key == "HIREBOARD_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_section_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "local:\n  api_base_url: http://localhost:4000/api\nproduction:\n  api_base_url: https://hire.example.com/api\n  timeout_seconds: 20\n",
        )
        .unwrap();

        let production = ConfigManager::load_section(&path, "production").unwrap();
        assert_eq!(production.timeout_seconds, Some(20));
        let local = ConfigManager::load_section(&path, "local").unwrap();
        assert_eq!(local.api_base_url.as_deref(), Some("http://localhost:4000/api"));

        let missing = ConfigManager::load_section(&dir.path().join("nope.yaml"), "local").unwrap();
        assert!(missing.api_base_url.is_none());
    }
}
