//! Key layout for miner records.
//!
//! ```text
//! /<root>/<metadata>/<addr>             JSON metadata record
//! /<root>/<on_chain>/<addr>             JSON on-chain record
//! /<root>/<on_chain>/<height>/<epoch>   epoch as 8-byte little-endian u64
//! ```

use crate::error::{IndexStoreError, IndexStoreResult};
use crate::key::Key;
use minerindex_common::{AddressError, KeyspaceConfig, MinerAddress};

/// Size of an encoded height marker
pub const HEIGHT_LEN: usize = 8;

/// Namespace keys a store writes under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyspace {
    metadata: Key,
    on_chain: Key,
    height: Key,
}

impl Keyspace {
    /// Build the namespaces described by `config`
    pub fn new(config: &KeyspaceConfig) -> IndexStoreResult<Self> {
        for segment in config.root.split('/').filter(|s| !s.is_empty()) {
            validate_segment("root", segment)?;
        }
        validate_segment("metadata", &config.metadata)?;
        validate_segment("on_chain", &config.on_chain)?;
        validate_segment("height", &config.height)?;

        let root = Key::new(&config.root);
        let on_chain = root.child_string(&config.on_chain);
        let keyspace = Self {
            metadata: root.child_string(&config.metadata),
            height: on_chain.child_string(&config.height),
            on_chain,
        };
        if keyspace.metadata == keyspace.on_chain {
            return Err(IndexStoreError::InvalidKeyspace(format!(
                "metadata and on_chain namespaces are both {}",
                keyspace.metadata
            )));
        }
        Ok(keyspace)
    }

    /// Namespace of metadata records
    #[must_use]
    pub fn metadata(&self) -> &Key {
        &self.metadata
    }

    /// Namespace of on-chain records
    #[must_use]
    pub fn on_chain(&self) -> &Key {
        &self.on_chain
    }

    /// Namespace of height markers
    #[must_use]
    pub fn height(&self) -> &Key {
        &self.height
    }

    /// Key of a miner's metadata record
    pub fn metadata_key(&self, addr: &str) -> Result<Key, AddressError> {
        MinerAddress::validate(addr)?;
        Ok(self.metadata.child_string(addr))
    }

    /// Key of a miner's on-chain record
    ///
    /// The height namespace sits inside the on-chain one, so its segment
    /// cannot double as a miner address there.
    pub fn on_chain_key(&self, addr: &str) -> Result<Key, AddressError> {
        MinerAddress::validate(addr)?;
        if addr == self.height.name() {
            return Err(AddressError::Reserved(addr.to_string()));
        }
        Ok(self.on_chain.child_string(addr))
    }

    /// Key of the height marker for `height`
    #[must_use]
    pub fn height_key(&self, height: u64) -> Key {
        self.height.child_string(height.to_string())
    }
}

impl Default for Keyspace {
    fn default() -> Self {
        let on_chain = Key::new("onchain");
        Self {
            metadata: Key::new("meta"),
            height: on_chain.child_string("height"),
            on_chain,
        }
    }
}

fn validate_segment(name: &str, segment: &str) -> IndexStoreResult<()> {
    if segment.is_empty() {
        return Err(IndexStoreError::InvalidKeyspace(format!(
            "{name} namespace cannot be empty"
        )));
    }
    if segment.contains('/') || segment == "." || segment == ".." {
        return Err(IndexStoreError::InvalidKeyspace(format!(
            "{name} namespace {segment:?} is not a single path segment"
        )));
    }
    Ok(())
}

/// Encode a height marker value
#[must_use]
pub fn encode_height(height: u64) -> [u8; HEIGHT_LEN] {
    height.to_le_bytes()
}

/// Decode a height marker value, `None` unless exactly 8 bytes
#[must_use]
pub fn decode_height(bytes: &[u8]) -> Option<u64> {
    let bytes: [u8; HEIGHT_LEN] = bytes.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_layout() {
        let keyspace = Keyspace::new(&KeyspaceConfig::default()).unwrap();
        assert_eq!(keyspace, Keyspace::default());
        assert_eq!(keyspace.metadata_key("f01").unwrap().as_str(), "/meta/f01");
        assert_eq!(keyspace.on_chain_key("f01").unwrap().as_str(), "/onchain/f01");
        assert_eq!(keyspace.height_key(100).as_str(), "/onchain/height/100");
    }

    #[test]
    fn test_rooted_layout() {
        let keyspace = Keyspace::new(&KeyspaceConfig::with_root("index/miner")).unwrap();
        assert_eq!(
            keyspace.metadata_key("f01").unwrap().as_str(),
            "/index/miner/meta/f01"
        );
        assert_eq!(
            keyspace.height_key(0).as_str(),
            "/index/miner/onchain/height/0"
        );
    }

    #[test]
    fn test_rejects_bad_addresses() {
        let keyspace = Keyspace::default();
        assert_eq!(
            keyspace.metadata_key("height/1"),
            Err(AddressError::InvalidChar('/'))
        );
        assert_eq!(keyspace.on_chain_key(""), Err(AddressError::Empty));
    }

    #[test]
    fn test_height_segment_reserved_for_on_chain() {
        let keyspace = Keyspace::default();
        assert_eq!(
            keyspace.on_chain_key("height"),
            Err(AddressError::Reserved("height".to_string()))
        );
        // Metadata lives in its own namespace, nothing to collide with
        assert_eq!(keyspace.metadata_key("height").unwrap().as_str(), "/meta/height");

        let custom = Keyspace::new(&KeyspaceConfig {
            height: "tip".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(custom.on_chain_key("tip").is_err());
        assert_eq!(custom.on_chain_key("height").unwrap().as_str(), "/onchain/height");
    }

    #[test]
    fn test_rejects_bad_config() {
        let empty = KeyspaceConfig {
            metadata: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            Keyspace::new(&empty),
            Err(IndexStoreError::InvalidKeyspace(_))
        ));

        let nested = KeyspaceConfig {
            height: "a/b".to_string(),
            ..Default::default()
        };
        assert!(Keyspace::new(&nested).is_err());

        let dotdot = KeyspaceConfig::with_root("x/../y");
        assert!(Keyspace::new(&dotdot).is_err());

        let clash = KeyspaceConfig {
            metadata: "onchain".to_string(),
            ..Default::default()
        };
        assert!(Keyspace::new(&clash).is_err());
    }

    #[test]
    fn test_height_bytes() {
        assert_eq!(encode_height(100), [100, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode_height(&[1, 1, 0, 0, 0, 0, 0, 0]), Some(257));
        assert_eq!(decode_height(&[1, 2, 3]), None);
    }

    proptest! {
        #[test]
        fn height_encoding_is_little_endian(epoch in 0i64..=i64::MAX) {
            let height = u64::try_from(epoch).unwrap();
            let bytes = encode_height(height);
            prop_assert_eq!(bytes.len(), HEIGHT_LEN);
            prop_assert_eq!(bytes[0], (height & 0xff) as u8);
            prop_assert_eq!(decode_height(&bytes), Some(height));
        }
    }
}
