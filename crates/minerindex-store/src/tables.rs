//! Redb table definitions.

use redb::TableDefinition;

// Key: cleaned datastore path (e.g. "/onchain/f01"), Value: raw bytes
pub const DATASTORE: TableDefinition<&str, &[u8]> = TableDefinition::new("datastore");
