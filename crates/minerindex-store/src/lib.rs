//! Miner Index Store - key-value persistence for miner indexes
//!
//! This crate lays miner metadata and on-chain state out in an ordered
//! key-value datastore. [`MetadataStore`] is write-only; the datastore
//! backends expose the full put/get/delete/query surface.

pub mod datastore;
pub mod db;
mod encode;
pub mod error;
pub mod key;
pub mod keyspace;
pub mod memory;
pub mod store;
mod tables;

// Re-exports
pub use datastore::{Datastore, DatastoreError, DatastoreResult};
pub use db::RedbDatastore;
pub use error::{IndexStoreError, IndexStoreResult, RecordKind};
pub use key::Key;
pub use keyspace::{Keyspace, decode_height, encode_height};
pub use memory::MemoryDatastore;
pub use store::MetadataStore;
