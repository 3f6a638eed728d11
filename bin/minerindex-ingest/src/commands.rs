//! Subcommand implementations

use anyhow::{Context, Result};
use minerindex_common::{ChainIndex, MetaIndex};
use minerindex_store::{Datastore, Key, Keyspace, MetadataStore, decode_height};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::info;

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("opening snapshot {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("decoding snapshot {}", path.display()))
}

/// Save a `MetaIndex` snapshot; returns the number of miners written
pub fn ingest_meta<D: Datastore>(store: &MetadataStore<D>, path: &Path) -> Result<usize> {
    let index: MetaIndex = read_snapshot(path)?;
    info!("Loaded metadata for {} miners from {}", index.len(), path.display());
    store.save_metadata(&index).context("saving metadata index")?;
    Ok(index.len())
}

/// Save a `ChainIndex` snapshot; returns the number of miners written
pub fn ingest_chain<D: Datastore>(store: &MetadataStore<D>, path: &Path) -> Result<usize> {
    let index: ChainIndex = read_snapshot(path)?;
    info!(
        "Loaded on-chain data for {} miners at epoch {} from {}",
        index.len(),
        index.last_updated,
        path.display()
    );
    store.save_on_chain(&index).context("saving on-chain index")?;
    Ok(index.len())
}

/// Print every entry below `prefix`; returns the number of entries
pub fn dump<D: Datastore>(
    ds: &D,
    keyspace: &Keyspace,
    prefix: &Key,
    out: &mut impl Write,
) -> Result<usize> {
    let entries = ds
        .query(prefix)
        .with_context(|| format!("querying {prefix}"))?;
    for (key, value) in &entries {
        let height = if keyspace.height().is_ancestor_of(key) {
            decode_height(value)
        } else {
            None
        };
        match height {
            Some(h) => writeln!(out, "{key}\theight={h}")?,
            None => writeln!(out, "{key}\t{} bytes", value.len())?,
        }
    }
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minerindex_store::MemoryDatastore;
    use std::sync::Arc;
    use tempfile::tempdir;

    const CHAIN: &str = r#"{
        "LastUpdated": 42,
        "Miners": {
            "f01": {"Power": 10, "RelativePower": 0.5, "SectorSize": 2048, "ActiveDeals": 1},
            "f02": {"Power": 10, "RelativePower": 0.5, "SectorSize": 2048, "ActiveDeals": 0}
        }
    }"#;

    const META: &str = r#"{
        "Info": {
            "f01": {
                "LastUpdated": "2020-08-01T12:00:00Z",
                "UserAgent": "lotus-0.4.2",
                "Location": {"Country": "US", "Longitude": -122.4, "Latitude": 37.7},
                "Online": true
            }
        }
    }"#;

    #[test]
    fn test_ingest_and_dump() {
        let dir = tempdir().unwrap();
        let chain = dir.path().join("chain.json");
        let meta = dir.path().join("meta.json");
        std::fs::write(&chain, CHAIN).unwrap();
        std::fs::write(&meta, META).unwrap();

        let ds = Arc::new(MemoryDatastore::new());
        let store = MetadataStore::with_defaults(Arc::clone(&ds));
        assert_eq!(ingest_chain(&store, &chain).unwrap(), 2);
        assert_eq!(ingest_meta(&store, &meta).unwrap(), 1);

        let mut out = Vec::new();
        let n = dump(&ds, store.keyspace(), &Key::root(), &mut out).unwrap();
        assert_eq!(n, 4);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("/onchain/height/42\theight=42"));
        assert!(text.contains("/onchain/f01\t"));
        assert!(text.contains("/meta/f01\t"));
    }

    #[test]
    fn test_bad_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chain.json");
        std::fs::write(&path, "{\"LastUpdated\": \"soon\"}").unwrap();

        let store = MetadataStore::with_defaults(MemoryDatastore::new());
        let err = ingest_chain(&store, &path).unwrap_err();
        assert!(err.to_string().contains("decoding snapshot"));

        let missing = dir.path().join("missing.json");
        assert!(ingest_meta(&store, &missing).is_err());
    }
}
