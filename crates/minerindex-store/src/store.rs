//! Write path for miner indexes.
//!
//! Each save walks its index and writes one key per miner, then returns.
//! Writes are not grouped into a transaction: when a save fails partway,
//! keys written before the failure stay written.

use crate::datastore::Datastore;
use crate::encode::to_json_vec;
use crate::error::{IndexStoreError, IndexStoreResult, RecordKind};
use crate::key::Key;
use crate::keyspace::{Keyspace, encode_height};
use minerindex_common::{ChainIndex, KeyspaceConfig, MetaIndex};
use serde::Serialize;
use tracing::{debug, info};

/// Saves miner metadata and on-chain state into a datastore.
pub struct MetadataStore<D> {
    ds: D,
    keyspace: Keyspace,
}

impl<D: Datastore> MetadataStore<D> {
    /// Create a store writing under the namespaces in `config`
    pub fn new(ds: D, config: &KeyspaceConfig) -> IndexStoreResult<Self> {
        let keyspace = Keyspace::new(config)?;
        Ok(Self { ds, keyspace })
    }

    /// Create a store using the default `/meta` and `/onchain` namespaces
    pub fn with_defaults(ds: D) -> Self {
        Self {
            ds,
            keyspace: Keyspace::default(),
        }
    }

    #[must_use]
    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// Creates/updates metadata information of miners.
    pub fn save_metadata<M: Serialize>(&self, index: &MetaIndex<M>) -> IndexStoreResult<()> {
        for (addr, meta) in &index.info {
            let key = self.keyspace.metadata_key(addr).map_err(|source| {
                IndexStoreError::InvalidAddress {
                    address: addr.clone(),
                    source,
                }
            })?;
            self.put_json(RecordKind::Metadata, addr, &key, meta)?;
        }

        info!("Saved metadata for {} miners", index.info.len());
        Ok(())
    }

    /// Creates/updates on-chain information of miners, then records
    /// `last_updated` as the latest saved height.
    pub fn save_on_chain<C: Serialize>(&self, index: &ChainIndex<C>) -> IndexStoreResult<()> {
        let height = u64::try_from(index.last_updated)
            .map_err(|_| IndexStoreError::NegativeEpoch(index.last_updated))?;

        for (addr, onchain) in &index.miners {
            let key = self.keyspace.on_chain_key(addr).map_err(|source| {
                IndexStoreError::InvalidAddress {
                    address: addr.clone(),
                    source,
                }
            })?;
            self.put_json(RecordKind::OnChain, addr, &key, onchain)?;
        }

        let key = self.keyspace.height_key(height);
        self.put(RecordKind::Height, &key, &encode_height(height))?;

        info!(
            "Saved on-chain data for {} miners at height {}",
            index.miners.len(),
            height
        );
        Ok(())
    }

    fn put_json<T: Serialize>(
        &self,
        kind: RecordKind,
        addr: &str,
        key: &Key,
        value: &T,
    ) -> IndexStoreResult<()> {
        let buf = to_json_vec(value).map_err(|source| IndexStoreError::Serialization {
            kind,
            address: addr.to_string(),
            source,
        })?;
        self.put(kind, key, &buf)
    }

    fn put(&self, kind: RecordKind, key: &Key, value: &[u8]) -> IndexStoreResult<()> {
        self.ds
            .put(key, value)
            .map_err(|source| IndexStoreError::Storage {
                kind,
                key: key.clone(),
                source,
            })?;
        debug!("Saved {} at {} ({} bytes)", kind, key, value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyspace::decode_height;
    use crate::memory::MemoryDatastore;
    use minerindex_common::OnChainData;
    use std::sync::Arc;

    fn power(power: u64) -> OnChainData {
        OnChainData {
            power,
            relative_power: 0.25,
            sector_size: 2048,
            active_deals: 1,
        }
    }

    #[test]
    fn test_save_on_chain_scenario() {
        let ds = Arc::new(MemoryDatastore::new());
        let store = MetadataStore::with_defaults(Arc::clone(&ds));

        let index = ChainIndex::new(100).with_miner("f01", power(42));
        store.save_on_chain(&index).unwrap();

        let raw = ds.get(&Key::new("/onchain/f01")).unwrap().unwrap();
        let decoded: OnChainData = serde_json::from_slice(&raw).unwrap();
        assert_eq!(decoded, power(42));

        let height = ds.get(&Key::new("/onchain/height/100")).unwrap().unwrap();
        assert_eq!(height, vec![100, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode_height(&height), Some(100));
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_empty_metadata_writes_nothing() {
        let ds = Arc::new(MemoryDatastore::new());
        let store = MetadataStore::with_defaults(Arc::clone(&ds));

        store.save_metadata(&MetaIndex::<OnChainData>::new()).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_negative_epoch_rejected() {
        let ds = Arc::new(MemoryDatastore::new());
        let store = MetadataStore::with_defaults(Arc::clone(&ds));

        let index = ChainIndex::new(-1).with_miner("f01", power(1));
        let err = store.save_on_chain(&index).unwrap_err();
        assert!(matches!(err, IndexStoreError::NegativeEpoch(-1)));
        assert!(ds.is_empty());
    }

    #[test]
    fn test_invalid_keyspace_rejected() {
        let config = KeyspaceConfig {
            on_chain: "a/b".to_string(),
            ..Default::default()
        };
        assert!(MetadataStore::new(MemoryDatastore::new(), &config).is_err());
    }
}
