use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::db::Database;
use crate::hn_client::DEFAULT_API_BASE;

pub const API_BASE_ENV: &str = "HACKER_STORIES_API_BASE";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub default_search_term: String,
    pub search_storage_key: String,
    pub request_timeout_secs: Option<u64>,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_search_term: "React".to_string(),
            search_storage_key: "search".to_string(),
            request_timeout_secs: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Reads `config.json` from the app data dir if there is one, then
    /// applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = Database::get_app_data_dir()?.join("config.json");
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(api_base) = std::env::var(API_BASE_ENV) {
            config.api_base = api_base;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::from_json(r#"{"default_search_term": "Rust", "request_timeout_secs": 10}"#).unwrap();
        assert_eq!(config.default_search_term, "Rust");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.search_storage_key, "search");
    }

    #[test]
    fn no_timeout_by_default() {
        assert_eq!(Config::default().request_timeout(), None);
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base": "http://localhost:9000", "data_dir": "/tmp/hs"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/hs")));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
