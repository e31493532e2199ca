use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Why a block failed chain verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFault {
    /// Genesis has a non-empty `prev_hash`, or a later block has an empty one.
    GenesisMarker,
    /// `prev_hash` does not match the hash of the preceding block.
    BrokenLink,
    /// Stored hash differs from the hash of the block's own message.
    HashMismatch,
    /// Hash is not below the target.
    InsufficientWork,
}

impl std::fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IntegrityFault::GenesisMarker => "genesis marker misplaced",
            IntegrityFault::BrokenLink => "prev_hash does not match previous block",
            IntegrityFault::HashMismatch => "stored hash does not match block content",
            IntegrityFault::InsufficientWork => "hash does not meet difficulty target",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid difficulty {0}: must be in 1..=255")]
    InvalidDifficulty(u32),

    #[error("nonce space exhausted at difficulty {difficulty}")]
    SearchExhausted { difficulty: u32 },

    #[error("chain integrity violation at block #{index}: {reason}")]
    ChainIntegrityViolation { index: usize, reason: IntegrityFault },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("stale tip: block builds on {found}, chain tip is {expected}")]
    StaleTip { expected: String, found: String },
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<hex::FromHexError> for LedgerError {
    fn from(err: hex::FromHexError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
