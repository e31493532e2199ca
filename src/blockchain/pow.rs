use log::trace;
use sha2::{Digest, Sha256};

use super::target::HashTarget;
use crate::error::{LedgerError, Result};

/// How many nonces are tried between progress callbacks.
pub const PROGRESS_INTERVAL: i64 = 1 << 16;

/// Proof-of-Work over a fixed `(prev_hash, payload, difficulty)` tuple.
///
/// `search` and `validate` both go through [`ProofOfWork::digest`], so a nonce
/// found by one is always accepted by the other.
#[derive(Debug, Clone, Copy)]
pub struct ProofOfWork<'a> {
    prev_hash: &'a [u8],
    payload: &'a [u8],
    target: HashTarget,
}

impl<'a> ProofOfWork<'a> {
    pub fn new(prev_hash: &'a [u8], payload: &'a [u8], target: HashTarget) -> Self {
        Self {
            prev_hash,
            payload,
            target,
        }
    }

    /// Message hashed for `nonce`:
    /// `prev_hash || payload || nonce (i64 BE) || difficulty (i64 BE)`.
    ///
    /// Changing this layout invalidates every block mined before the change.
    pub fn build_message(&self, nonce: i64) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.prev_hash.len() + self.payload.len() + 16);
        data.extend_from_slice(self.prev_hash);
        data.extend_from_slice(self.payload);
        data.extend_from_slice(&nonce.to_be_bytes());
        data.extend_from_slice(&i64::from(self.target.difficulty()).to_be_bytes());
        data
    }

    /// SHA-256 of the message for `nonce`.
    pub fn digest(&self, nonce: i64) -> [u8; 32] {
        Sha256::digest(self.build_message(nonce)).into()
    }

    /// Find the first nonce (counting up from 0) whose digest meets the target.
    pub fn search(&self) -> Result<(i64, [u8; 32])> {
        self.search_with(|_, _| {})
    }

    /// Like [`search`](Self::search), calling `on_progress(nonce, last_hash)`
    /// every [`PROGRESS_INTERVAL`] attempts.
    pub fn search_with<F>(&self, on_progress: F) -> Result<(i64, [u8; 32])>
    where
        F: FnMut(i64, &[u8; 32]),
    {
        self.search_from(0, on_progress)
    }

    pub(crate) fn search_from<F>(&self, start: i64, mut on_progress: F) -> Result<(i64, [u8; 32])>
    where
        F: FnMut(i64, &[u8; 32]),
    {
        for nonce in start.max(0)..=i64::MAX {
            let hash = self.digest(nonce);
            if self.target.is_met_by(&hash) {
                return Ok((nonce, hash));
            }
            if nonce % PROGRESS_INTERVAL == 0 {
                trace!("pow: nonce={} hash={}", nonce, hex::encode(hash));
                on_progress(nonce, &hash);
            }
        }

        Err(LedgerError::SearchExhausted {
            difficulty: self.target.difficulty(),
        })
    }

    /// Re-derive the digest for `nonce` and check it against the target.
    pub fn validate(&self, nonce: i64) -> bool {
        nonce >= 0 && self.target.is_met_by(&self.digest(nonce))
    }
}
