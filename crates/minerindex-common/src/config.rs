//! Configuration types for the miner index store
//!
//! Namespaces live here instead of in package-level constants so each store
//! instance can be pointed at its own part of a shared datastore.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Namespace layout of the stored key-space
///
/// With the defaults, keys are `/meta/<addr>`, `/onchain/<addr>` and
/// `/onchain/height/<epoch>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyspaceConfig {
    /// Optional root all namespaces are nested under (empty = datastore root)
    pub root: String,
    /// Namespace for per-miner metadata records
    pub metadata: String,
    /// Namespace for per-miner on-chain records
    pub on_chain: String,
    /// Namespace, under `on_chain`, for last-updated height markers
    pub height: String,
}

impl Default for KeyspaceConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            metadata: "meta".to_string(),
            on_chain: "onchain".to_string(),
            height: "height".to_string(),
        }
    }
}

impl KeyspaceConfig {
    /// Default layout nested under `root`
    #[must_use]
    pub fn with_root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

/// On-disk store configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database file
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`
    pub db_file: String,
    /// Key-space layout
    pub keyspace: KeyspaceConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/var/lib/minerindex"),
            db_file: "index.redb".to_string(),
            keyspace: KeyspaceConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Full path of the database file
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/minerindex/index.redb"));
        assert_eq!(config.keyspace.metadata, "meta");
        assert_eq!(config.keyspace.on_chain, "onchain");
        assert_eq!(config.keyspace.height, "height");
        assert!(config.keyspace.root.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"data_dir":"/tmp/idx","keyspace":{"root":"powergate"}}"#)
                .unwrap();
        assert_eq!(config.db_path(), PathBuf::from("/tmp/idx/index.redb"));
        assert_eq!(config.keyspace, KeyspaceConfig::with_root("powergate"));
    }
}
