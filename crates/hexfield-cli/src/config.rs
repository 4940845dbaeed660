//! Optional JSON configuration file.
//!
//! ```json
//! { "store_path": "/var/lib/hexfield/templates.json", "log_level": "info" }
//! ```
//!
//! Command-line flags override anything set here.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use hexfield_store::DEFAULT_STORE_PATH;
use serde::Deserialize;
use tracing::Level;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub store_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub log_level: Level,
}

impl Settings {
    pub fn resolve(
        file: FileConfig,
        store_path: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        let store_path = store_path
            .or(file.store_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
        let log_level = log_level
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Settings {
            store_path,
            log_level: parse_level(&log_level),
        }
    }
}

/// Unknown names fall back to `warn`.
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(FileConfig::default(), None, None);
        assert_eq!(settings.store_path, PathBuf::from("templates.json"));
        assert_eq!(settings.log_level, Level::WARN);
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig {
            store_path: Some(PathBuf::from("from_file.json")),
            log_level: Some("debug".to_string()),
        };
        let settings = Settings::resolve(file, Some(PathBuf::from("flag.json")), None);
        assert_eq!(settings.store_path, PathBuf::from("flag.json"));
        assert_eq!(settings.log_level, Level::DEBUG);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hexfield.json");
        fs::write(&path, r#"{ "store_path": "t.json", "log_level": "ERROR" }"#).unwrap();

        let settings = Settings::resolve(FileConfig::load(&path).unwrap(), None, None);
        assert_eq!(settings.store_path, PathBuf::from("t.json"));
        assert_eq!(settings.log_level, Level::ERROR);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hexfield.json");
        fs::write(&path, r#"{ "store": "t.json" }"#).unwrap();
        assert!(FileConfig::load(&path).is_err());
    }

    #[test]
    fn test_parse_level_fallback() {
        assert_eq!(parse_level("Info"), Level::INFO);
        assert_eq!(parse_level("loud"), Level::WARN);
    }
}
