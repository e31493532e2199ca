//! Wire format for blocks: JSON with hex-encoded byte fields.

use serde::{Deserialize, Serialize};

use super::Block;
use crate::error::{LedgerError, Result};

const HASH_LEN: usize = 32;

/// Serialized shape of a [`Block`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub prev_hash: String,
    pub payload: String,
    pub nonce: i64,
    pub hash: String,
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        Self {
            prev_hash: hex::encode(block.prev_hash()),
            payload: hex::encode(block.payload()),
            nonce: block.nonce(),
            hash: hex::encode(block.hash()),
        }
    }
}

impl TryFrom<BlockRecord> for Block {
    type Error = LedgerError;

    fn try_from(record: BlockRecord) -> Result<Self> {
        let prev_hash = hex::decode(&record.prev_hash)?;
        if !prev_hash.is_empty() && prev_hash.len() != HASH_LEN {
            return Err(LedgerError::Serialization(format!(
                "prev_hash must be empty or {} bytes, got {}",
                HASH_LEN,
                prev_hash.len()
            )));
        }

        let hash: [u8; HASH_LEN] = hex::decode(&record.hash)?.try_into().map_err(|v: Vec<u8>| {
            LedgerError::Serialization(format!("hash must be {} bytes, got {}", HASH_LEN, v.len()))
        })?;

        if record.nonce < 0 {
            return Err(LedgerError::Serialization(format!(
                "nonce must be non-negative, got {}",
                record.nonce
            )));
        }

        let payload = hex::decode(&record.payload)?;
        Ok(Block::from_parts(payload, prev_hash, record.nonce, hash))
    }
}

/// Encode a block to bytes.
pub fn serialize(block: &Block) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(block)?)
}

/// Decode a block from bytes. The result is not trusted until it passes
/// [`Block::check_proof`].
pub fn deserialize(bytes: &[u8]) -> Result<Block> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::HashTarget;

    fn sample() -> Block {
        let t = HashTarget::new(8).unwrap();
        let genesis = Block::genesis(t).unwrap();
        Block::create(vec![0u8, 159, 146, 150], genesis.hash(), t).unwrap()
    }

    #[test]
    fn decoded_block_matches_original() {
        let b = sample();
        let bytes = serialize(&b).unwrap();
        let back = deserialize(&bytes).unwrap();
        assert_eq!(back, b);
        assert_eq!(back.prev_hash().len(), 32);
    }

    #[test]
    fn genesis_keeps_empty_prev_hash() {
        let g = Block::genesis(HashTarget::new(8).unwrap()).unwrap();
        let back = deserialize(&serialize(&g).unwrap()).unwrap();
        assert!(back.prev_hash().is_empty());
        assert_eq!(back, g);
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = serialize(&sample()).unwrap();
        let err = deserialize(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, LedgerError::Serialization(_)));
    }

    #[test]
    fn rejects_bad_field_widths() {
        let mut record = BlockRecord::from(sample());
        record.hash.truncate(62);
        let json = serde_json::to_vec(&record).unwrap();
        assert!(matches!(deserialize(&json), Err(LedgerError::Serialization(_))));

        let mut record = BlockRecord::from(sample());
        record.prev_hash = "abcd".into();
        let json = serde_json::to_vec(&record).unwrap();
        assert!(matches!(deserialize(&json), Err(LedgerError::Serialization(_))));
    }

    #[test]
    fn rejects_bad_hex_and_negative_nonce() {
        let mut record = BlockRecord::from(sample());
        record.payload = "zz".into();
        let json = serde_json::to_vec(&record).unwrap();
        assert!(matches!(deserialize(&json), Err(LedgerError::Serialization(_))));

        let mut record = BlockRecord::from(sample());
        record.nonce = -5;
        let json = serde_json::to_vec(&record).unwrap();
        assert!(matches!(deserialize(&json), Err(LedgerError::Serialization(_))));
    }
}
