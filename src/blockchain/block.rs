use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::codec::BlockRecord;
use super::pow::ProofOfWork;
use super::target::HashTarget;
use super::GENESIS_PAYLOAD;
use crate::error::{IntegrityFault, LedgerError, Result};

/// A sealed block. Fields are write-once: the only constructors are
/// [`Block::create`] (mining) and deserialization, and deserialized blocks are
/// re-validated before a [`Chain`](super::Chain) accepts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BlockRecord", try_from = "BlockRecord")]
pub struct Block {
    payload: Vec<u8>,
    prev_hash: Vec<u8>, // empty only for genesis
    nonce: i64,
    hash: [u8; 32],
}

impl Block {
    /// Mine a block on top of `prev_hash`.
    pub fn create(payload: impl Into<Vec<u8>>, prev_hash: &[u8], target: HashTarget) -> Result<Self> {
        Self::create_with(payload, prev_hash, target, |_, _| {})
    }

    /// [`create`](Self::create), reporting search progress to `on_progress`.
    pub fn create_with<F>(
        payload: impl Into<Vec<u8>>,
        prev_hash: &[u8],
        target: HashTarget,
        on_progress: F,
    ) -> Result<Self>
    where
        F: FnMut(i64, &[u8; 32]),
    {
        let payload = payload.into();
        let (nonce, hash) = ProofOfWork::new(prev_hash, &payload, target).search_with(on_progress)?;
        debug!(
            "sealed block: nonce={} hash={} (difficulty {})",
            nonce,
            hex::encode(hash),
            target.difficulty()
        );
        Ok(Self {
            payload,
            prev_hash: prev_hash.to_vec(),
            nonce,
            hash,
        })
    }

    /// The first block of every chain: fixed payload, empty `prev_hash`.
    pub fn genesis(target: HashTarget) -> Result<Self> {
        Self::create(GENESIS_PAYLOAD, &[], target)
    }

    /// Reassemble a block from decoded parts. Nothing is checked beyond
    /// field widths; see [`Block::check_proof`].
    pub(crate) fn from_parts(payload: Vec<u8>, prev_hash: Vec<u8>, nonce: i64, hash: [u8; 32]) -> Self {
        Self {
            payload,
            prev_hash,
            nonce,
            hash,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    pub fn nonce(&self) -> i64 {
        self.nonce
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }

    /// Proof-of-Work over this block's own fields.
    pub fn proof(&self, target: HashTarget) -> ProofOfWork<'_> {
        ProofOfWork::new(&self.prev_hash, &self.payload, target)
    }

    /// Recompute the hash from the block's fields and check it both matches
    /// the stored hash and meets `target`.
    pub fn check_proof(&self, target: HashTarget) -> std::result::Result<(), IntegrityFault> {
        let pow = self.proof(target);
        if pow.digest(self.nonce) != self.hash {
            return Err(IntegrityFault::HashMismatch);
        }
        if !pow.validate(self.nonce) {
            return Err(IntegrityFault::InsufficientWork);
        }
        Ok(())
    }

    /// [`check_proof`](Self::check_proof) reported as a chain error at `index`.
    pub fn validate_at(&self, index: usize, target: HashTarget) -> Result<()> {
        self.check_proof(target)
            .map_err(|reason| LedgerError::ChainIntegrityViolation { index, reason })
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Previous Hash: {}", hex::encode(&self.prev_hash))?;
        writeln!(f, "Data in Block: {}", String::from_utf8_lossy(&self.payload))?;
        writeln!(f, "Nonce: {}", self.nonce)?;
        write!(f, "Hash: {}", hex::encode(self.hash))
    }
}
