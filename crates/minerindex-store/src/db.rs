//! Persistent datastore backed by redb.
//!
//! Every key lives in one table. Each `put`/`delete` runs in its own write
//! transaction and is durable once it returns; there is no batching across
//! calls.

use crate::datastore::{Datastore, DatastoreResult};
use crate::key::Key;
use crate::tables;
use redb::{Database, ReadableTable};
use std::path::Path;
use tracing::debug;

/// Ordered key-value datastore stored in a redb file
pub struct RedbDatastore {
    db: Database,
}

impl RedbDatastore {
    /// Open (or create) the redb database at the given path.
    pub fn open(path: impl AsRef<Path>) -> DatastoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Create the table eagerly so later read txns don't fail
        let write_txn = db.begin_write()?;
        {
            let _t = write_txn.open_table(tables::DATASTORE)?;
        }
        write_txn.commit()?;

        debug!("Opened redb datastore at {}", path.display());
        Ok(Self { db })
    }
}

impl Datastore for RedbDatastore {
    fn put(&self, key: &Key, value: &[u8]) -> DatastoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::DATASTORE)?;
            table.insert(key.as_str(), value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get(&self, key: &Key) -> DatastoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(tables::DATASTORE)?;
        Ok(table.get(key.as_str())?.map(|v| v.value().to_vec()))
    }

    fn delete(&self, key: &Key) -> DatastoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::DATASTORE)?;
            table.remove(key.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn query(&self, prefix: &Key) -> DatastoreResult<Vec<(Key, Vec<u8>)>> {
        let start = prefix.range_prefix();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(tables::DATASTORE)?;
        let mut result = Vec::new();
        for entry in table.range(start.as_str()..)? {
            let entry = entry?;
            let k = entry.0.value();
            // Descendants are contiguous; stop at the first key past them
            if !k.starts_with(start.as_str()) {
                break;
            }
            result.push((Key::new(k), entry.1.value().to_vec()));
        }
        Ok(result)
    }
}
