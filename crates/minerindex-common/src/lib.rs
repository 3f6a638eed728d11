//! Miner Index Common - Shared types and configuration
//!
//! This crate provides the record types produced by the miner indexers and
//! the configuration used to lay them out in a key-value datastore.

pub mod config;
pub mod types;

pub use config::{KeyspaceConfig, StoreConfig};
pub use types::*;
