//! In-memory datastore.

use crate::datastore::{Datastore, DatastoreResult};
use crate::key::Key;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Ordered key-value datastore held in memory
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    entries: RwLock<BTreeMap<Key, Vec<u8>>>,
}

impl MemoryDatastore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All stored keys, in order
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.entries.read().keys().cloned().collect()
    }
}

impl Datastore for MemoryDatastore {
    fn put(&self, key: &Key, value: &[u8]) -> DatastoreResult<()> {
        self.entries.write().insert(key.clone(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &Key) -> DatastoreResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn delete(&self, key: &Key) -> DatastoreResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn query(&self, prefix: &Key) -> DatastoreResult<Vec<(Key, Vec<u8>)>> {
        let entries = self.entries.read();
        Ok(entries
            .iter()
            .filter(|(k, _)| prefix.is_ancestor_of(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let ds = MemoryDatastore::new();
        let key = Key::new("/onchain/f01");
        ds.put(&key, b"value").unwrap();
        assert_eq!(ds.get(&key).unwrap(), Some(b"value".to_vec()));
        assert_eq!(ds.len(), 1);

        ds.delete(&key).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.get(&key).unwrap(), None);
    }

    #[test]
    fn test_memory_query() {
        let ds = MemoryDatastore::new();
        ds.put(&Key::new("/meta/f01"), b"1").unwrap();
        ds.put(&Key::new("/meta-x/f01"), b"2").unwrap();
        ds.put(&Key::new("/meta/f02"), b"3").unwrap();

        let found = ds.query(&Key::new("/meta")).unwrap();
        assert_eq!(
            found,
            vec![
                (Key::new("/meta/f01"), b"1".to_vec()),
                (Key::new("/meta/f02"), b"3".to_vec()),
            ]
        );
    }
}
