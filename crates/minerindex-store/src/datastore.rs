//! Ordered key-value datastore interface.
//!
//! Values are opaque bytes. Implementations must be safe to share between
//! threads; they give no ordering guarantee between concurrent writers
//! beyond last-writer-wins per key.

use crate::key::Key;
use std::sync::Arc;

/// Error type for datastore operations
#[derive(Debug, thiserror::Error)]
pub enum DatastoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::DatabaseError),
    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("redb transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("datastore error: {0}")]
    Backend(String),
}

impl From<redb::TransactionError> for DatastoreError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(e))
    }
}

impl DatastoreError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

pub type DatastoreResult<T> = Result<T, DatastoreError>;

/// Ordered key-value datastore
pub trait Datastore: Send + Sync {
    /// Create or overwrite the value under `key`
    fn put(&self, key: &Key, value: &[u8]) -> DatastoreResult<()>;

    /// Value under `key`, if any
    fn get(&self, key: &Key) -> DatastoreResult<Option<Vec<u8>>>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &Key) -> DatastoreResult<()>;

    /// All entries strictly below `prefix`, in key order
    fn query(&self, prefix: &Key) -> DatastoreResult<Vec<(Key, Vec<u8>)>>;
}

impl<D: Datastore + ?Sized> Datastore for Arc<D> {
    fn put(&self, key: &Key, value: &[u8]) -> DatastoreResult<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &Key) -> DatastoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn delete(&self, key: &Key) -> DatastoreResult<()> {
        (**self).delete(key)
    }

    fn query(&self, prefix: &Key) -> DatastoreResult<Vec<(Key, Vec<u8>)>> {
        (**self).query(prefix)
    }
}

impl<D: Datastore + ?Sized> Datastore for &D {
    fn put(&self, key: &Key, value: &[u8]) -> DatastoreResult<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &Key) -> DatastoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn delete(&self, key: &Key) -> DatastoreResult<()> {
        (**self).delete(key)
    }

    fn query(&self, prefix: &Key) -> DatastoreResult<Vec<(Key, Vec<u8>)>> {
        (**self).query(prefix)
    }
}
