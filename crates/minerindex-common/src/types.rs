//! Core type definitions for the miner index
//!
//! Records are JSON-encoded with PascalCase field names so that they match
//! what earlier indexer deployments already wrote to the datastore.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Chain epoch (block height). Signed on the wire, only non-negative values
/// can be persisted as height markers.
pub type ChainEpoch = i64;

/// Maximum length of a miner address in bytes
pub const MAX_ADDRESS_LEN: usize = 128;

/// Miner address (e.g. `f01234`), safe to use as a key segment
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct MinerAddress(String);

impl MinerAddress {
    /// Create a new miner address
    pub fn new(addr: impl Into<String>) -> Result<Self, AddressError> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self(addr))
    }

    /// Get the address as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate an address against the key-segment allowlist
    pub fn validate(addr: &str) -> Result<(), AddressError> {
        if addr.is_empty() {
            return Err(AddressError::Empty);
        }
        if addr.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong(addr.len()));
        }

        // Only ASCII letters, digits, '-' and '_'. This keeps the key
        // separator and path tricks like ".." out of the key.
        for c in addr.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
                return Err(AddressError::InvalidChar(c));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for MinerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MinerAddress({:?})", self.0)
    }
}

impl TryFrom<String> for MinerAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MinerAddress> for String {
    fn from(addr: MinerAddress) -> Self {
        addr.0
    }
}

impl AsRef<str> for MinerAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when validating a miner address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("miner address cannot be empty")]
    Empty,
    #[error("miner address is {0} bytes, at most 128 allowed")]
    TooLong(usize),
    #[error("miner address contains invalid character: {0:?}")]
    InvalidChar(char),
    #[error("miner address {0:?} collides with a reserved namespace")]
    Reserved(String),
}

/// Geographic location of a miner
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Location {
    pub country: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Descriptive metadata gathered about a miner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MinerMeta {
    pub last_updated: DateTime<Utc>,
    pub user_agent: String,
    pub location: Location,
    pub online: bool,
}

/// On-chain state of a miner
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OnChainData {
    pub power: u64,
    pub relative_power: f64,
    pub sector_size: u64,
    pub active_deals: u64,
}

/// Metadata records keyed by miner address
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetaIndex<M = MinerMeta> {
    pub info: HashMap<String, M>,
}

impl<M> MetaIndex<M> {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: HashMap::new(),
        }
    }

    /// Number of miners in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.info.len()
    }

    /// Whether the index holds no miners
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

impl<M> Default for MetaIndex<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> FromIterator<(String, M)> for MetaIndex<M> {
    fn from_iter<I: IntoIterator<Item = (String, M)>>(iter: I) -> Self {
        Self {
            info: iter.into_iter().collect(),
        }
    }
}

/// On-chain records keyed by miner address, as of `last_updated`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainIndex<C = OnChainData> {
    pub last_updated: ChainEpoch,
    pub miners: HashMap<String, C>,
}

impl<C> ChainIndex<C> {
    /// Create an empty index at the given epoch
    #[must_use]
    pub fn new(last_updated: ChainEpoch) -> Self {
        Self {
            last_updated,
            miners: HashMap::new(),
        }
    }

    /// Add or replace the record of a miner
    #[must_use]
    pub fn with_miner(mut self, addr: impl Into<String>, data: C) -> Self {
        self.miners.insert(addr.into(), data);
        self
    }

    /// Number of miners in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.miners.len()
    }

    /// Whether the index holds no miners
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.miners.is_empty()
    }
}

impl<C> Default for ChainIndex<C> {
    fn default() -> Self {
        Self::new(0)
    }
}
