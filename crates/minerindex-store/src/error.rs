//! Error types for the metadata store.

use crate::datastore::DatastoreError;
use crate::key::Key;
use minerindex_common::{AddressError, ChainEpoch};
use std::fmt;

/// Kind of record being written, for error context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Metadata,
    OnChain,
    Height,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Metadata => "metadata",
            Self::OnChain => "onchain",
            Self::Height => "height",
        })
    }
}

/// Error type for metadata store operations
#[derive(Debug, thiserror::Error)]
pub enum IndexStoreError {
    #[error("marshaling {kind} for miner {address}: {source}")]
    Serialization {
        kind: RecordKind,
        address: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("saving {kind} in store at {key}: {source}")]
    Storage {
        kind: RecordKind,
        key: Key,
        #[source]
        source: DatastoreError,
    },

    #[error("invalid miner address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("negative epoch {0} cannot be stored as a height")]
    NegativeEpoch(ChainEpoch),

    #[error("invalid keyspace configuration: {0}")]
    InvalidKeyspace(String),
}

impl IndexStoreError {
    /// Check if retrying the same call could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Miner address the error is about, if any
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Serialization { address, .. } | Self::InvalidAddress { address, .. } => {
                Some(address.as_str())
            }
            _ => None,
        }
    }
}

pub type IndexStoreResult<T> = Result<T, IndexStoreError>;
