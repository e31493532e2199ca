use log::{info, warn};

use super::{Block, HashTarget};
use crate::error::{IntegrityFault, LedgerError, Result};

/// Append-only chain of proof-of-work blocks, seeded with a genesis block.
///
/// Blocks are owned by index; the link to a predecessor is only the
/// `prev_hash == previous.hash` byte equality.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    target: HashTarget,
}

impl Chain {
    /// Initialize a new chain with a mined genesis block.
    pub fn new(difficulty: u32) -> Result<Self> {
        let target = HashTarget::new(difficulty)?;
        let genesis = Block::genesis(target)?;
        info!(
            "chain initialized: difficulty={} genesis={}",
            difficulty,
            hex::encode(genesis.hash())
        );
        Ok(Self {
            blocks: vec![genesis],
            target,
        })
    }

    /// Return the last block in the chain.
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain should always have at least the genesis block")
    }

    /// Mine and append a new block carrying `payload`.
    pub fn append(&mut self, payload: impl Into<Vec<u8>>) -> Result<&Block> {
        self.append_with(payload, |_, _| {})
    }

    /// [`append`](Self::append), reporting search progress to `on_progress`.
    pub fn append_with<F>(&mut self, payload: impl Into<Vec<u8>>, on_progress: F) -> Result<&Block>
    where
        F: FnMut(i64, &[u8; 32]),
    {
        let block = Block::create_with(payload, self.tip().hash(), self.target, on_progress)?;
        self.accept(block)
    }

    /// Append a block mined elsewhere. It must build on the current tip and
    /// carry a valid proof of work.
    pub fn accept(&mut self, block: Block) -> Result<&Block> {
        let index = self.blocks.len();
        if block.prev_hash() != self.tip().hash() {
            warn!("rejecting block #{}: parent is not the tip", index);
            return Err(LedgerError::StaleTip {
                expected: hex::encode(self.tip().hash()),
                found: hex::encode(block.prev_hash()),
            });
        }
        if let Err(err) = block.validate_at(index, self.target) {
            warn!("rejecting block #{}: {}", index, err);
            return Err(err);
        }

        info!(
            "appended block #{} hash={} nonce={}",
            index,
            hex::encode(block.hash()),
            block.nonce()
        );
        self.blocks.push(block);
        Ok(self.tip())
    }

    /// Blocks in chronological order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.target.difficulty()
    }

    pub fn target(&self) -> HashTarget {
        self.target
    }

    /// Validate the entire chain: genesis marker, then every link, then every
    /// proof of work. The first failing index is reported.
    pub fn verify(&self) -> Result<()> {
        verify_blocks(&self.blocks, self.target)
    }

    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Verify an arbitrary block sequence, e.g. one decoded from storage.
pub fn verify_blocks(blocks: &[Block], target: HashTarget) -> Result<()> {
    let violation = |index, reason| LedgerError::ChainIntegrityViolation { index, reason };

    match blocks.first() {
        None => return Err(violation(0, IntegrityFault::GenesisMarker)),
        Some(genesis) if !genesis.is_genesis() => {
            return Err(violation(0, IntegrityFault::GenesisMarker));
        }
        Some(_) => {}
    }

    for (i, pair) in blocks.windows(2).enumerate() {
        let (prev, current) = (&pair[0], &pair[1]);
        if current.is_genesis() {
            return Err(violation(i + 1, IntegrityFault::GenesisMarker));
        }
        if current.prev_hash() != prev.hash() {
            return Err(violation(i + 1, IntegrityFault::BrokenLink));
        }
    }

    for (i, block) in blocks.iter().enumerate() {
        block.validate_at(i, target)?;
    }

    Ok(())
}
