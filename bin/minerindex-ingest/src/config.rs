//! Configuration file structure

use anyhow::{Context, Result};
use minerindex_common::StoreConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load the config file, falling back to defaults when it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&config_str)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/ingest.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ingest.toml");
        std::fs::write(
            &path,
            r#"
[store]
data_dir = "/data/index"

[store.keyspace]
root = "powergate"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.store.db_path(), PathBuf::from("/data/index/index.redb"));
        assert_eq!(config.store.keyspace.root, "powergate");
        assert_eq!(config.store.keyspace.metadata, "meta");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ingest.toml");
        std::fs::write(&path, "[store\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
